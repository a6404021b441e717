//! Headless core of the forest: the wall-clock time-of-day clock, the palette
//! table, procedural scene state and the generative ambient audio engine.
//!
//! Nothing here opens a window or an audio device. The rendering crate turns
//! `SceneState` + `Palette` into pixels and hands the synth graph to Bevy's
//! audio output.

use bevy::prelude::*;

pub mod ambient_audio;
pub mod ambient_settings;
pub mod config;
pub mod forest_rng;
pub mod palette;
pub mod scene;
pub mod time_of_day;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use forest_rng::ForestRng;
pub use time_of_day::{TimeCategory, TimeOfDay, TimeOfDayChanged};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ForestRng>();

        app.add_plugins((
            time_of_day::TimeOfDayPlugin,
            ambient_audio::AmbientAudioPlugin,
        ));
    }
}
