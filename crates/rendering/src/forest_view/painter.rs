//! Painting passes for one forest frame.
//!
//! Back to front: sky, sun or moon, rolling terrain, trees (already sorted by
//! baseline), fireflies. Everything is hard-edged rectangles so the upscaled
//! texture keeps its pixel-art look.

use simulation::config::CELESTIAL_X_FRACTION;
use simulation::palette::{CelestialKind, Palette, Rgba, FIREFLY_COLOR};
use simulation::scene::{lit_fireflies, SceneState, TreeDescriptor, Viewport};

use super::canvas::PixelCanvas;

/// Terrain strip spacing and width. Strips overlap by one pixel.
const TERRAIN_STEP: usize = 4;
const TERRAIN_STRIP_WIDTH: i32 = 5;
/// Terrain top sits this far above the bottom edge before the hill offset.
const TERRAIN_DEPTH: f32 = 100.0;
const HILL_BASE: f32 = 20.0;
const HILL_AMPLITUDE: f32 = 15.0;
const HILL_FREQUENCY: f32 = 0.02;

const TRUNK_WIDTH: i32 = 4;

/// Per-frame facts, mostly for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub trees: usize,
    pub lit_fireflies: usize,
}

/// Paint a full frame of `scene` into `canvas` using `palette`.
pub fn paint_frame(canvas: &mut PixelCanvas, scene: &SceneState, palette: &Palette) -> FrameStats {
    let viewport = canvas.viewport();
    let time = scene.time();

    canvas.vertical_gradient(palette.sky_top, palette.sky_bottom);
    paint_celestial(canvas, viewport, palette);
    paint_terrain(canvas, viewport, palette.terrain);

    for tree in scene.trees() {
        paint_tree(canvas, tree, time, palette);
    }

    let lit = if palette.fireflies {
        paint_fireflies(canvas, time, viewport)
    } else {
        0
    };

    FrameStats {
        trees: scene.trees().len(),
        lit_fireflies: lit,
    }
}

/// The sun is a blocky cross of three rectangles; the moon a small square.
pub fn paint_celestial(canvas: &mut PixelCanvas, viewport: Viewport, palette: &Palette) {
    let celestial = palette.celestial;
    let cx = (viewport.width as f32 * CELESTIAL_X_FRACTION).floor() as i32;
    let cy = (viewport.height as f32 * celestial.vertical_position).floor() as i32;
    let color = celestial.color;

    match celestial.kind {
        CelestialKind::Sun => {
            canvas.fill_rect(cx - 6, cy - 2, 12, 4, color);
            canvas.fill_rect(cx - 4, cy - 4, 8, 8, color);
            canvas.fill_rect(cx - 2, cy - 6, 4, 12, color);
        }
        CelestialKind::Moon => {
            canvas.fill_rect(cx - 3, cy - 3, 6, 6, color);
        }
    }
}

/// Height of the hill line at column `x`.
pub fn hill_height(x: f32) -> f32 {
    HILL_BASE + (x * HILL_FREQUENCY).sin() * HILL_AMPLITUDE
}

pub fn paint_terrain(canvas: &mut PixelCanvas, viewport: Viewport, color: Rgba) {
    let height = viewport.height as f32;
    for x in (0..viewport.width as usize).step_by(TERRAIN_STEP) {
        let hill = hill_height(x as f32);
        let top = (height - TERRAIN_DEPTH - hill).floor() as i32;
        let depth = (TERRAIN_DEPTH + hill).ceil() as i32;
        canvas.fill_rect(x as i32, top, TERRAIN_STRIP_WIDTH, depth, color);
    }
}

/// Trunk from the baseline up, then a rounded 16x16 crown displaced by sway.
pub fn paint_tree(canvas: &mut PixelCanvas, tree: &TreeDescriptor, time: f32, palette: &Palette) {
    let trunk_top = (tree.y - tree.height).floor() as i32;
    canvas.fill_rect(
        tree.x.floor() as i32,
        trunk_top,
        TRUNK_WIDTH,
        tree.height.round() as i32,
        palette.trunk,
    );

    let foliage = palette.foliage[tree.foliage_variant % palette.foliage.len()];
    let fx = (tree.x - 8.0 + tree.sway(time) + 2.0).floor() as i32;
    let fy = (tree.y - tree.height - 16.0 + 5.0).floor() as i32;

    canvas.fill_rect(fx + 4, fy, 8, 2, foliage);
    canvas.fill_rect(fx + 2, fy + 2, 12, 2, foliage);
    canvas.fill_rect(fx, fy + 4, 16, 8, foliage);
    canvas.fill_rect(fx + 2, fy + 12, 12, 2, foliage);
    canvas.fill_rect(fx + 4, fy + 14, 8, 2, foliage);
}

/// Returns how many fireflies were lit.
pub fn paint_fireflies(canvas: &mut PixelCanvas, time: f32, viewport: Viewport) -> usize {
    let mut lit = 0;
    for point in lit_fireflies(time, viewport) {
        canvas.set_pixel(point.x.floor() as i32, point.y.floor() as i32, FIREFLY_COLOR);
        lit += 1;
    }
    lit
}
