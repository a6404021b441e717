//! Player-facing controls for the ambient soundscape.
//!
//! `AmbientSoundSettings` is the data layer only: the UI flips `enabled` and
//! moves `volume`, and the audio engine picks the change up through Bevy
//! change detection.

use bevy::prelude::*;

use crate::config::DEFAULT_VOLUME;

/// Sound toggle and master volume. Volume is kept in `[0.0, 1.0]`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AmbientSoundSettings {
    /// Starts off: output may only begin after an explicit user action.
    pub enabled: bool,
    pub volume: f32,
}

impl Default for AmbientSoundSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl AmbientSoundSettings {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            enabled: false,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Level the master gain should settle at: 0 when disabled.
    pub fn target_level(&self) -> f32 {
        if self.enabled {
            self.volume
        } else {
            0.0
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Set volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}
