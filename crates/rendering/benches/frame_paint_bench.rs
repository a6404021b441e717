//! Criterion benchmarks for painting the forest.
//!
//! Benchmarks:
//!   - paint one frame per time-of-day palette at a 1280x800 window (320x200)
//!   - paint one frame at a 4K window (960x540)
//!   - generate a fresh tree layout
//!
//! Budget: a frame paint must stay well under 1 ms so it never competes with
//! the rest of the frame.
//!
//! Run with: cargo bench -p rendering --bench frame_paint_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rendering::forest_view::{paint_frame, PixelCanvas};
use simulation::palette::palette_for;
use simulation::scene::{generate_trees, SceneState, Viewport};
use simulation::time_of_day::TimeCategory;

fn bench_paint_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint_frame");

    let viewport = Viewport::from_physical(1280.0, 800.0);
    for category in TimeCategory::ALL {
        let mut scene = SceneState::new(&mut ChaCha8Rng::seed_from_u64(42), viewport);
        let mut canvas = PixelCanvas::new(viewport);
        let palette = palette_for(category);
        group.bench_with_input(
            BenchmarkId::new("1280x800", category.label()),
            &category,
            |b, _| {
                b.iter(|| {
                    scene.advance();
                    black_box(paint_frame(&mut canvas, &scene, palette));
                });
            },
        );
    }

    let large = Viewport::from_physical(3840.0, 2160.0);
    let mut scene = SceneState::new(&mut ChaCha8Rng::seed_from_u64(42), large);
    let mut canvas = PixelCanvas::new(large);
    let night = palette_for(TimeCategory::Night);
    group.bench_function("3840x2160_night", |b| {
        b.iter(|| {
            scene.advance();
            black_box(paint_frame(&mut canvas, &scene, night));
        });
    });

    group.finish();
}

fn bench_generate_trees(c: &mut Criterion) {
    let viewport = Viewport::from_physical(1280.0, 800.0);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    c.bench_function("generate_trees", |b| {
        b.iter(|| black_box(generate_trees(&mut rng, viewport)));
    });
}

criterion_group!(benches, bench_paint_frame, bench_generate_trees);
criterion_main!(benches);
