//! Presentation side of the forest: the pixel-art scene and the audio output
//! that carries the ambient soundscape.

use bevy::prelude::*;

pub mod audio_output;
pub mod forest_view;

pub use audio_output::{AmbientOutputPlugin, AmbientStream};
pub use forest_view::{ForestRenderLoop, ForestViewPlugin};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ForestViewPlugin, AmbientOutputPlugin));
    }
}
