//! The render loop as an explicit `Stopped` / `Running` state machine.
//!
//! A scene activation (`start`) generates a fresh tree layout for the given
//! time of day. `frame` advances and repaints while running and does nothing
//! while stopped. A category change is a full stop + start.

use bevy::prelude::*;
use rand::Rng;

use simulation::palette::{palette_for, Palette};
use simulation::scene::{SceneState, Viewport};
use simulation::time_of_day::TimeCategory;

use super::canvas::PixelCanvas;
use super::painter::{paint_frame, FrameStats};

/// Logical size used before the first window measurement.
pub const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 200,
    height: 150,
};

#[derive(Debug, Clone, Default)]
pub enum RenderLoopState {
    #[default]
    Stopped,
    Running {
        scene: SceneState,
        category: TimeCategory,
        palette: &'static Palette,
    },
}

#[derive(Resource, Debug, Clone)]
pub struct ForestRenderLoop {
    state: RenderLoopState,
    canvas: PixelCanvas,
    frames: u64,
}

impl Default for ForestRenderLoop {
    fn default() -> Self {
        Self::new(FALLBACK_VIEWPORT)
    }
}

impl ForestRenderLoop {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: RenderLoopState::Stopped,
            canvas: PixelCanvas::new(viewport),
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RenderLoopState::Running { .. })
    }

    pub fn state(&self) -> &RenderLoopState {
        &self.state
    }

    pub fn category(&self) -> Option<TimeCategory> {
        match &self.state {
            RenderLoopState::Running { category, .. } => Some(*category),
            RenderLoopState::Stopped => None,
        }
    }

    pub fn scene(&self) -> Option<&SceneState> {
        match &self.state {
            RenderLoopState::Running { scene, .. } => Some(scene),
            RenderLoopState::Stopped => None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.canvas.viewport()
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    /// Frames painted since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Activate a scene for `category`. A running scene is torn down first,
    /// so this is also the rebuild path.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R, category: TimeCategory) {
        self.stop();
        let scene = SceneState::new(rng, self.canvas.viewport());
        self.state = RenderLoopState::Running {
            scene,
            category,
            palette: palette_for(category),
        };
        debug!("Forest scene started for {}", category);
    }

    /// Returns whether a running scene was actually stopped.
    pub fn stop(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            RenderLoopState::Running { category, .. } => {
                debug!("Forest scene stopped ({})", category);
                true
            }
            RenderLoopState::Stopped => false,
        }
    }

    /// Adopt a new logical size. Applies whether or not a scene is running.
    pub fn resize(&mut self, viewport: Viewport) {
        self.canvas.resize(viewport);
        if let RenderLoopState::Running { scene, .. } = &mut self.state {
            scene.resize(viewport);
        }
    }

    /// Advance the scene clock and repaint. `None` while stopped.
    pub fn frame(&mut self) -> Option<FrameStats> {
        let RenderLoopState::Running { scene, palette, .. } = &mut self.state else {
            return None;
        };
        scene.advance();
        let stats = paint_frame(&mut self.canvas, scene, palette);
        self.frames += 1;
        Some(stats)
    }
}
