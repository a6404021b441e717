//! Tests for the forest view.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;
    use bevy::window::WindowResized;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use simulation::palette::{palette_for, CelestialKind, FIREFLY_COLOR};
    use simulation::scene::{lit_fireflies, SceneState, TreeDescriptor, Viewport};
    use simulation::time_of_day::{FixedHour, TimeCategory, TimeOfDayClock};
    use simulation::SimulationPlugin;

    use crate::forest_view::canvas::PixelCanvas;
    use crate::forest_view::image_gen::create_canvas_image;
    use crate::forest_view::painter::{
        hill_height, paint_celestial, paint_frame, paint_terrain, paint_tree,
    };
    use crate::forest_view::render_loop::{ForestRenderLoop, FALLBACK_VIEWPORT};
    use crate::forest_view::systems::ForestViewPlugin;
    use crate::forest_view::types::{ForestCanvas, ForestSurface};

    const VIEW: Viewport = Viewport {
        width: 200,
        height: 150,
    };

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(4)
    }

    fn count(canvas: &PixelCanvas, color: [u8; 4]) -> usize {
        canvas.pixels().iter().filter(|p| **p == color).count()
    }

    // -----------------------------------------------------------------------
    // Painting
    // -----------------------------------------------------------------------

    #[test]
    fn test_sun_is_three_stacked_rects() {
        let day = palette_for(TimeCategory::Day);
        assert_eq!(day.celestial.kind, CelestialKind::Sun);
        let mut canvas = PixelCanvas::new(VIEW);
        paint_celestial(&mut canvas, VIEW, day);

        // Centre at (160, 22): union of 12x4, 8x8 and 4x12 is 48 + 64 + 48
        // minus the pairwise overlaps (32 + 16 + 32) plus the triple (16).
        assert_eq!(count(&canvas, day.celestial.color), 96);
        assert_eq!(canvas.pixel(160, 22), Some(day.celestial.color));
        assert_eq!(canvas.pixel(154, 20), Some(day.celestial.color));
        assert_eq!(canvas.pixel(158, 16), Some(day.celestial.color));
        assert_ne!(canvas.pixel(154, 18), Some(day.celestial.color));
    }

    #[test]
    fn test_moon_is_small_square() {
        let night = palette_for(TimeCategory::Night);
        let mut canvas = PixelCanvas::new(VIEW);
        paint_celestial(&mut canvas, VIEW, night);
        assert_eq!(count(&canvas, night.celestial.color), 36);
    }

    #[test]
    fn test_terrain_covers_every_column_below_hill_line() {
        let color = [1, 2, 3, 255];
        let mut canvas = PixelCanvas::new(VIEW);
        paint_terrain(&mut canvas, VIEW, color);
        // Column 0: hill height 20, so the top is 150 - 100 - 20 = 30.
        assert_eq!(hill_height(0.0), 20.0);
        assert_eq!(canvas.pixel(0, 30), Some(color));
        assert_ne!(canvas.pixel(0, 29), Some(color));
        for x in 0..VIEW.width {
            assert_eq!(canvas.pixel(x, VIEW.height - 1), Some(color), "column {x}");
        }
    }

    #[test]
    fn test_tree_trunk_and_crown() {
        let palette = palette_for(TimeCategory::Day);
        let tree = TreeDescriptor {
            x: 50.0,
            y: 140.0,
            height: 60.0,
            foliage_variant: 1,
            sway_phase: 0.0,
        };
        let mut canvas = PixelCanvas::new(VIEW);
        paint_tree(&mut canvas, &tree, 0.0, palette);

        let leaf = palette.foliage[1];
        assert_eq!(canvas.pixel(51, 100), Some(palette.trunk));
        assert_eq!(canvas.pixel(52, 75), Some(leaf));
        // Crown covers the top of the trunk.
        assert_eq!(canvas.pixel(51, 80), Some(leaf));
        // Rounded corner stays empty.
        assert_ne!(canvas.pixel(44, 69), Some(leaf));
        assert_eq!(canvas.pixel(48, 69), Some(leaf));
    }

    #[test]
    fn test_sway_moves_only_the_crown() {
        let palette = palette_for(TimeCategory::Day);
        let tree = TreeDescriptor {
            x: 50.0,
            y: 140.0,
            height: 60.0,
            foliage_variant: 0,
            sway_phase: 0.0,
        };
        let mut still = PixelCanvas::new(VIEW);
        paint_tree(&mut still, &tree, 0.0, palette);
        let mut swayed = PixelCanvas::new(VIEW);
        paint_tree(&mut swayed, &tree, std::f32::consts::FRAC_PI_2, palette);

        let leaf = palette.foliage[0];
        // Full sway to the right shifts the crown by two pixels.
        assert_eq!(still.pixel(44, 75), Some(leaf));
        assert_ne!(swayed.pixel(44, 75), Some(leaf));
        assert_ne!(still.pixel(60, 75), Some(leaf));
        assert_eq!(swayed.pixel(60, 75), Some(leaf));
        assert_eq!(still.pixel(51, 120), swayed.pixel(51, 120));
    }

    #[test]
    fn test_fireflies_only_with_palette_flag() {
        let scene = SceneState::new(&mut rng(), VIEW);

        let mut day = PixelCanvas::new(VIEW);
        let stats = paint_frame(&mut day, &scene, palette_for(TimeCategory::Day));
        assert_eq!(stats.lit_fireflies, 0);
        assert_eq!(stats.trees, 30);

        let mut night = PixelCanvas::new(VIEW);
        let stats = paint_frame(&mut night, &scene, palette_for(TimeCategory::Night));
        assert_eq!(stats.lit_fireflies, lit_fireflies(scene.time(), VIEW).count());
        assert!(count(&night, FIREFLY_COLOR) <= stats.lit_fireflies);
    }

    #[test]
    fn test_frame_starts_with_sky_gradient() {
        let palette = palette_for(TimeCategory::Evening);
        let scene = SceneState::new(&mut rng(), VIEW);
        let mut canvas = PixelCanvas::new(VIEW);
        paint_frame(&mut canvas, &scene, palette);
        let near_top = |p: [u8; 4]| (0..3).all(|c| (p[c] as i32 - palette.sky_top[c] as i32).abs() <= 3);
        let top_row = (0..VIEW.width).filter_map(|x| canvas.pixel(x, 0));
        assert!(top_row.clone().any(near_top));
        assert!(top_row.clone().all(|p| p != palette.sky_bottom));
    }

    #[test]
    fn test_canvas_image_is_nearest_sampled_rgba() {
        let img = create_canvas_image(VIEW);
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 150);
        assert_eq!(img.data.len(), 200 * 150 * 4);
    }

    // -----------------------------------------------------------------------
    // Render loop state machine
    // -----------------------------------------------------------------------

    #[test]
    fn test_stop_is_idempotent() {
        let mut render_loop = ForestRenderLoop::new(VIEW);
        assert!(!render_loop.stop());
        render_loop.start(&mut rng(), TimeCategory::Day);
        assert!(render_loop.stop());
        assert!(!render_loop.stop());
        assert!(!render_loop.is_running());
    }

    #[test]
    fn test_frames_while_stopped_do_nothing() {
        let mut render_loop = ForestRenderLoop::new(VIEW);
        let before = render_loop.canvas().pixels().to_vec();
        assert_eq!(render_loop.frame(), None);
        assert_eq!(render_loop.frames(), 0);
        assert_eq!(render_loop.canvas().pixels(), before.as_slice());
    }

    #[test]
    fn test_running_frames_advance_scene_time() {
        let mut render_loop = ForestRenderLoop::new(VIEW);
        render_loop.start(&mut rng(), TimeCategory::Night);
        for _ in 0..10 {
            assert!(render_loop.frame().is_some());
        }
        assert_eq!(render_loop.frames(), 10);
        let time = render_loop.scene().unwrap().time();
        assert!((time - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_category_change_rebuilds_scene() {
        let mut r = rng();
        let mut render_loop = ForestRenderLoop::new(VIEW);
        render_loop.start(&mut r, TimeCategory::Day);
        render_loop.frame();
        let day_trees = render_loop.scene().unwrap().trees().to_vec();

        render_loop.start(&mut r, TimeCategory::Evening);
        assert_eq!(render_loop.category(), Some(TimeCategory::Evening));
        let scene = render_loop.scene().unwrap();
        assert_eq!(scene.time(), 0.0);
        assert_ne!(scene.trees(), day_trees.as_slice());
    }

    #[test]
    fn test_resize_keeps_trees_and_resizes_canvas() {
        let mut render_loop = ForestRenderLoop::new(VIEW);
        render_loop.start(&mut rng(), TimeCategory::Day);
        let trees = render_loop.scene().unwrap().trees().to_vec();
        render_loop.resize(Viewport::new(100, 75));
        assert_eq!(render_loop.viewport(), Viewport::new(100, 75));
        assert_eq!(render_loop.scene().unwrap().trees(), trees.as_slice());
        assert!(render_loop.frame().is_some());
        assert_eq!(render_loop.canvas().pixels().len(), 100 * 75);
    }

    #[test]
    fn test_resize_while_stopped_is_remembered() {
        let mut render_loop = ForestRenderLoop::new(VIEW);
        render_loop.resize(Viewport::new(50, 40));
        render_loop.start(&mut rng(), TimeCategory::Morning);
        assert_eq!(render_loop.scene().unwrap().viewport(), Viewport::new(50, 40));
    }

    // -----------------------------------------------------------------------
    // Plugin (headless)
    // -----------------------------------------------------------------------

    fn headless_app(hour: u32, with_images: bool) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(TimeOfDayClock::with_fixed_hour(hour));
        if with_images {
            app.init_resource::<Assets<Image>>();
        }
        app.add_plugins((SimulationPlugin, ForestViewPlugin));
        app.update();
        app
    }

    #[test]
    fn test_plugin_starts_scene_for_initial_category_and_uploads() {
        let mut app = headless_app(21, true);
        app.update();

        let render_loop = app.world().resource::<ForestRenderLoop>();
        assert_eq!(render_loop.category(), Some(TimeCategory::Night));
        assert_eq!(render_loop.viewport(), FALLBACK_VIEWPORT);
        assert!(render_loop.frames() >= 1);
        let bytes = render_loop.canvas().as_bytes().to_vec();

        let handle = app.world().resource::<ForestSurface>().image.clone();
        let images = app.world().resource::<Assets<Image>>();
        assert_eq!(images.get(&handle).unwrap().data, bytes);
    }

    #[test]
    fn test_missing_surface_is_a_no_op() {
        let mut app = headless_app(12, false);
        app.update();
        app.update();
        assert!(app.world().get_resource::<ForestSurface>().is_none());
        let render_loop = app.world().resource::<ForestRenderLoop>();
        assert!(render_loop.is_running());
        assert_eq!(render_loop.frames(), 0);
    }

    #[test]
    fn test_window_resize_changes_logical_size() {
        let mut app = headless_app(12, true);
        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 400.0,
            height: 300.0,
        });
        app.update();

        let render_loop = app.world().resource::<ForestRenderLoop>();
        assert_eq!(render_loop.viewport(), Viewport::new(100, 75));
        let handle = app.world().resource::<ForestSurface>().image.clone();
        let image = app.world().resource::<Assets<Image>>().get(&handle).unwrap();
        assert_eq!(image.width(), 100);
        assert_eq!(image.height(), 75);
    }

    #[test]
    fn test_hour_change_rebuilds_at_next_poll() {
        let mut app = headless_app(16, true);
        assert_eq!(
            app.world().resource::<ForestRenderLoop>().category(),
            Some(TimeCategory::Day)
        );
        app.world_mut()
            .resource_mut::<TimeOfDayClock>()
            .set_source(FixedHour(18));
        for _ in 0..605 {
            app.update();
        }
        assert_eq!(
            app.world().resource::<ForestRenderLoop>().category(),
            Some(TimeCategory::Evening)
        );
    }

    #[test]
    fn test_app_exit_stops_loop() {
        let mut app = headless_app(12, true);
        app.world_mut().send_event(AppExit::Success);
        app.update();
        assert!(!app.world().resource::<ForestRenderLoop>().is_running());
    }

    #[test]
    fn test_window_resize_ignored_after_exit() {
        let mut app = headless_app(12, true);
        app.world_mut().send_event(AppExit::Success);
        app.update();
        let before = app.world().resource::<ForestRenderLoop>().viewport();

        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 400.0,
            height: 300.0,
        });
        app.update();

        assert_eq!(app.world().resource::<ForestRenderLoop>().viewport(), before);
        let handle = app.world().resource::<ForestSurface>().image.clone();
        let image = app.world().resource::<Assets<Image>>().get(&handle).unwrap();
        assert_eq!(image.width(), before.width);
        assert_eq!(image.height(), before.height);

        let mut sprites = app
            .world_mut()
            .query_filtered::<&Sprite, With<ForestCanvas>>();
        for sprite in sprites.iter(app.world()) {
            assert_ne!(sprite.custom_size, Some(Vec2::new(400.0, 300.0)));
        }
    }
}
