//! Mutable state of the forest scene: viewport, trees and the animation clock.
//!
//! Geometry here is in logical pixels (physical size divided by
//! [`PIXEL_SCALE`]). The painter in the rendering crate turns this state plus
//! a [`Palette`](crate::palette::Palette) into pixels.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{
    FIREFLY_COUNT, PIXEL_SCALE, SCENE_TIME_STEP, SWAY_AMPLITUDE, TREE_BASELINE_OVERHANG,
    TREE_BASELINE_SPREAD, TREE_COUNT, TREE_HEIGHT_SPREAD, TREE_MIN_HEIGHT,
};

// =============================================================================
// Viewport
// =============================================================================

/// Scene size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Logical size for a physical surface: divide by the pixel scale and
    /// round up. Never smaller than 1x1 so a minimised window still has a
    /// valid backing surface.
    pub fn from_physical(width: f32, height: f32) -> Self {
        Self::from_physical_with_scale(width, height, PIXEL_SCALE)
    }

    pub fn from_physical_with_scale(width: f32, height: f32, scale: u32) -> Self {
        let scale = scale.max(1) as f32;
        let logical = |v: f32| (v.max(0.0) / scale).ceil().max(1.0) as u32;
        Self {
            width: logical(width),
            height: logical(height),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// =============================================================================
// Trees
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeDescriptor {
    /// Horizontal position of the trunk's left edge.
    pub x: f32,
    /// Baseline (foot of the trunk). Larger is nearer the viewer.
    pub y: f32,
    pub height: f32,
    /// Index into `Palette::foliage`.
    pub foliage_variant: usize,
    /// Per-tree offset so trees never sway in lockstep.
    pub sway_phase: f32,
}

impl TreeDescriptor {
    /// Horizontal foliage displacement at scene time `time`.
    pub fn sway(&self, time: f32) -> f32 {
        sway_offset(time, self.sway_phase)
    }
}

/// Sway displacement for a phase at a time. Bounded by [`SWAY_AMPLITUDE`].
pub fn sway_offset(time: f32, phase: f32) -> f32 {
    (time + phase).sin() * SWAY_AMPLITUDE
}

/// Scatter [`TREE_COUNT`] trees across the viewport, baselines biased toward
/// the bottom edge, sorted back to front.
pub fn generate_trees<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Vec<TreeDescriptor> {
    let width = viewport.width as f32;
    let height = viewport.height as f32;

    let mut trees: Vec<TreeDescriptor> = (0..TREE_COUNT)
        .map(|_| TreeDescriptor {
            x: rng.gen::<f32>() * width,
            y: height - rng.gen::<f32>() * TREE_BASELINE_SPREAD + TREE_BASELINE_OVERHANG,
            height: TREE_MIN_HEIGHT + rng.gen::<f32>() * TREE_HEIGHT_SPREAD,
            foliage_variant: rng.gen_range(0..3),
            sway_phase: rng.gen::<f32>() * TAU,
        })
        .collect();

    trees.sort_by(|a, b| a.y.total_cmp(&b.y));
    trees
}

// =============================================================================
// Fireflies
// =============================================================================

/// A lit firefly in logical pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireflyPoint {
    pub x: f32,
    pub y: f32,
}

/// Fireflies that are lit at `time`. Each orbits on its own sine/cosine path
/// and blinks on the sign of a third sine, so the field twinkles unevenly.
pub fn lit_fireflies(time: f32, viewport: Viewport) -> impl Iterator<Item = FireflyPoint> {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    (0..FIREFLY_COUNT).filter_map(move |i| {
        let i = i as f32;
        if (time * 3.0 + i).sin() <= 0.0 {
            return None;
        }
        Some(FireflyPoint {
            x: (time * 0.5 + i).sin() * width / 2.0 + width / 2.0,
            y: (time * 0.3 + i * 2.0).cos() * height / 3.0 + height / 2.0,
        })
    })
}

// =============================================================================
// Scene state
// =============================================================================

/// Everything the render loop mutates between frames.
#[derive(Debug, Clone)]
pub struct SceneState {
    viewport: Viewport,
    trees: Vec<TreeDescriptor>,
    time: f32,
}

impl SceneState {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            viewport,
            trees: generate_trees(rng, viewport),
            time: 0.0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn trees(&self) -> &[TreeDescriptor] {
        &self.trees
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the animation clock by one frame.
    pub fn advance(&mut self) {
        self.time += SCENE_TIME_STEP;
    }

    /// Adopt a new viewport size. Trees keep their original positions, so a
    /// shrink can leave some of them outside the new bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
