use std::path::PathBuf;

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use conversation::{ActiveSession, GeminiConfig, GeminiSession, OfflineSession};
use simulation::ambient_settings::AmbientSoundSettings;
use simulation::config::APP_VOLUME;
use simulation::time_of_day::TimeOfDayClock;
use simulation::ForestRng;

mod launch;

use launch::LaunchOptions;

fn main() {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Awá Whispers".to_string(),
                    resolution: (1280.0, 800.0).into(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    });

    // Read after DefaultPlugins so warnings reach the log.
    let options = LaunchOptions::from_env();

    // Resources inserted before the plugins take precedence over their
    // defaults. The audio engine forks its trigger stream from this RNG.
    let forest_rng = match options.seed {
        Some(seed) => ForestRng::from_seed_u64(seed),
        None => ForestRng::from_entropy(),
    };
    app.insert_resource(forest_rng)
        .insert_resource(AmbientSoundSettings::with_volume(APP_VOLUME))
        .insert_resource(conversation_backend(&options));

    if let Some(hour) = options.hour {
        info!("Clock pinned to {hour}:00");
        app.insert_resource(TimeOfDayClock::with_fixed_hour(hour));
    }

    app.add_plugins((
        simulation::SimulationPlugin,
        rendering::RenderingPlugin,
        conversation::ConversationPlugin,
        ui::UiPlugin,
    ));

    // Screenshot mode: wait for the scene to settle, save one frame, exit
    if let Some(path) = options.screenshot {
        app.insert_resource(ScreenshotRequest { frame: 0, path });
        app.add_systems(Update, drive_screenshot);
    }

    app.run();
}

fn conversation_backend(options: &LaunchOptions) -> ActiveSession {
    let Some(key) = options.api_key.clone() else {
        info!("No GEMINI_API_KEY or API_KEY set, using the offline persona");
        return ActiveSession::new(OfflineSession::default());
    };
    match GeminiSession::new(GeminiConfig::default(), Some(key)) {
        Ok(session) => ActiveSession::new(session),
        Err(err) => {
            warn!("Gemini client unavailable ({err}), using the offline persona");
            ActiveSession::new(OfflineSession::default())
        }
    }
}

const SCREENSHOT_FRAME: u32 = 120;
const SCREENSHOT_EXIT_FRAME: u32 = SCREENSHOT_FRAME + 30;

#[derive(Resource)]
struct ScreenshotRequest {
    frame: u32,
    path: PathBuf,
}

fn drive_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    mut exit: EventWriter<AppExit>,
) {
    request.frame += 1;
    if request.frame == SCREENSHOT_FRAME {
        info!("Saving screenshot to {}", request.path.display());
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(request.path.clone()));
    } else if request.frame >= SCREENSHOT_EXIT_FRAME {
        exit.send(AppExit::Success);
    }
}
