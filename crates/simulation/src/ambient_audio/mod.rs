//! Procedural ambient soundscape: wind, drone, chimes and creature calls,
//! synthesised in process and mixed through a smoothly ramped master gain.
//!
//! Nothing is built until the player first enables sound. The rendering crate
//! attaches the shared graph to Bevy's audio output once it exists.

pub mod dsp;
pub mod engine;
pub mod graph;
pub mod host;
pub mod layers;
pub mod param;
pub mod voice;

use bevy::prelude::*;

use crate::ambient_settings::AmbientSoundSettings;

pub use engine::{lock_graph, AmbientAudioEngine, LayerStats, SharedGraph};
pub use graph::SynthGraph;
pub use host::{AmbientAudioError, AudioHost, FlakyHost, OutputLink, StreamHost};
pub use layers::AmbientLayer;

// =============================================================================
// Systems
// =============================================================================

/// Push settings changes into the engine. Runs on the first frame too, which
/// is a no-op because sound starts disabled.
fn apply_sound_settings(
    settings: Res<AmbientSoundSettings>,
    mut engine: ResMut<AmbientAudioEngine>,
) {
    if !settings.is_changed() {
        return;
    }
    if let Err(err) = engine.apply(settings.enabled, settings.volume) {
        warn!("Ambient sound stays silent: {err}");
    }
}

fn tick_ambient_layers(time: Res<Time>, mut engine: ResMut<AmbientAudioEngine>) {
    engine.tick(time.delta());
}

fn teardown_on_exit(mut exits: EventReader<AppExit>, mut engine: ResMut<AmbientAudioEngine>) {
    if exits.read().next().is_some() {
        engine.teardown();
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct AmbientAudioPlugin;

impl Plugin for AmbientAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AmbientSoundSettings>()
            .init_resource::<OutputLink>()
            .init_resource::<AmbientAudioEngine>()
            .add_systems(Update, (apply_sound_settings, tick_ambient_layers).chain())
            .add_systems(Last, teardown_on_exit);
    }
}
