//! ECS systems for the forest view.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use simulation::config::PIXEL_SCALE;
use simulation::forest_rng::ForestRng;
use simulation::scene::Viewport;
use simulation::time_of_day::TimeOfDay;

use super::image_gen::{create_canvas_image, upload_canvas};
use super::render_loop::ForestRenderLoop;
use super::types::{ForestCanvas, ForestSurface};

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ForestViewPlugin;

impl Plugin for ForestViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ForestRenderLoop>()
            .add_event::<WindowResized>()
            .add_systems(Startup, spawn_forest_canvas)
            .add_systems(
                Update,
                (
                    restart_on_time_of_day_change,
                    resize_on_window_change,
                    paint_forest_frame,
                )
                    .chain(),
            )
            .add_systems(Last, stop_on_exit);
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Create the canvas texture, a 2D camera and the sprite showing it, sized to
/// the primary window. Without an image asset store there is nothing to draw
/// into and the view stays dormant.
fn spawn_forest_canvas(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    images: Option<ResMut<Assets<Image>>>,
    mut render_loop: ResMut<ForestRenderLoop>,
) {
    let Some(mut images) = images else {
        warn!("No image assets available, forest canvas disabled");
        return;
    };

    let size = match windows.get_single() {
        Ok(window) => Vec2::new(window.width(), window.height()),
        Err(_) => {
            let viewport = render_loop.viewport();
            Vec2::new(
                (viewport.width * PIXEL_SCALE) as f32,
                (viewport.height * PIXEL_SCALE) as f32,
            )
        }
    };
    let viewport = Viewport::from_physical(size.x, size.y);
    render_loop.resize(viewport);

    let image = images.add(create_canvas_image(viewport));
    commands.insert_resource(ForestSurface {
        image: image.clone(),
    });
    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            image,
            custom_size: Some(size),
            ..default()
        },
        ForestCanvas,
    ));
}

/// Follow window size changes while the loop runs. Only the latest event of
/// a frame matters; events arriving after the loop stopped are dropped.
fn resize_on_window_change(
    mut resized: EventReader<WindowResized>,
    mut render_loop: ResMut<ForestRenderLoop>,
    mut sprites: Query<&mut Sprite, With<ForestCanvas>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    if !render_loop.is_running() {
        return;
    }
    render_loop.resize(Viewport::from_physical(last.width, last.height));
    for mut sprite in &mut sprites {
        sprite.custom_size = Some(Vec2::new(last.width, last.height));
    }
}

/// (Re)activate the scene whenever the time-of-day category changes,
/// including the initial reading.
fn restart_on_time_of_day_change(
    time_of_day: Res<TimeOfDay>,
    mut rng: ResMut<ForestRng>,
    mut render_loop: ResMut<ForestRenderLoop>,
) {
    if !time_of_day.is_changed() {
        return;
    }
    render_loop.start(&mut rng.0, time_of_day.category);
    info!("Forest scene built for {}", time_of_day.category);
}

/// Advance and repaint, then upload. Skipped when there is no surface.
fn paint_forest_frame(
    surface: Option<Res<ForestSurface>>,
    images: Option<ResMut<Assets<Image>>>,
    mut render_loop: ResMut<ForestRenderLoop>,
) {
    let (Some(surface), Some(mut images)) = (surface, images) else {
        return;
    };
    let Some(image) = images.get_mut(&surface.image) else {
        return;
    };
    if render_loop.frame().is_some() {
        upload_canvas(render_loop.canvas(), image);
    }
}

fn stop_on_exit(mut exits: EventReader<AppExit>, mut render_loop: ResMut<ForestRenderLoop>) {
    if exits.read().next().is_some() && render_loop.stop() {
        info!("Forest render loop stopped");
    }
}
