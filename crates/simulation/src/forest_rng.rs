//! Seedable randomness for procedural generation.
//!
//! Wraps `ChaCha8Rng` so tree layouts and audio triggers are reproducible
//! from a seed. Nothing in the crate calls `rand::thread_rng()`; systems take
//! `ResMut<ForestRng>` and the audio engine owns its own injected generator.

use bevy::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource for scene generation.
#[derive(Resource)]
pub struct ForestRng(pub ChaCha8Rng);

impl Default for ForestRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl ForestRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seed from OS entropy, for interactive runs.
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }

    /// Split off an independent generator, e.g. for the audio engine.
    pub fn fork(&mut self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0.next_u64())
    }
}
