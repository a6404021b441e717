//! Components and resources tying the forest canvas to the ECS.

use bevy::prelude::*;

/// Marker for the full-window sprite that shows the forest texture.
#[derive(Component)]
pub struct ForestCanvas;

/// The texture the render loop uploads into. Absent until startup has
/// created it (or forever, in headless apps), in which case frames are
/// skipped.
#[derive(Resource, Debug, Clone)]
pub struct ForestSurface {
    pub image: Handle<Image>,
}
