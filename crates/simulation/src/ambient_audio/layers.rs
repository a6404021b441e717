//! The four ambient layers and their trigger timers.
//!
//! Wind and drone run continuously once the graph exists. Wind gusts, chimes
//! and creature calls are driven by repeating timers; every tick of a timer
//! rolls the dice, so the cadence is fixed while the outcome is random.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::voice::{CreatureCall, CHIME_NOTES, CHIRP_BASE_HZ, CHIRP_SPREAD_HZ, CROAK_BASE_HZ, CROAK_SPREAD_HZ};

// =============================================================================
// Layer constants
// =============================================================================

pub const WIND_BASE_CUTOFF: f32 = 300.0;
pub const WIND_BASE_GAIN: f32 = 0.7;
pub const GUST_CUTOFF_MIN: f32 = 200.0;
pub const GUST_CUTOFF_SPREAD: f32 = 400.0;
pub const GUST_GAIN_MIN: f32 = 0.5;
pub const GUST_GAIN_SPREAD: f32 = 0.4;
/// Seconds a gust takes to reach its targets.
pub const GUST_RAMP_SECS: f64 = 3.0;

pub const DRONE_HZ: f32 = 55.0;
pub const DRONE_GAIN: f32 = 0.25;

/// Coloration filter on the creature bus.
pub const CREATURE_FILTER_CUTOFF: f32 = 2000.0;

const WIND_INTERVAL_SECS: f32 = 4.0;
const CHIME_INTERVAL_SECS: f32 = 3.5;
const CREATURE_INTERVAL_SECS: f32 = 4.5;

/// A chime plays when the roll exceeds this.
const CHIME_THRESHOLD: f32 = 0.7;
/// A creature calls when the roll exceeds this.
const CREATURE_THRESHOLD: f32 = 0.6;
/// Above this a creature chirps, otherwise it croaks.
const CHIRP_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbientLayer {
    Wind,
    Drone,
    Chimes,
    Creatures,
}

impl AmbientLayer {
    pub const ALL: [AmbientLayer; 4] = [
        AmbientLayer::Wind,
        AmbientLayer::Drone,
        AmbientLayer::Chimes,
        AmbientLayer::Creatures,
    ];
}

// =============================================================================
// Random rolls
// =============================================================================

/// New wind targets for a gust: `(cutoff_hz, gain)`.
pub fn roll_gust<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32) {
    let cutoff = GUST_CUTOFF_MIN + rng.gen::<f32>() * GUST_CUTOFF_SPREAD;
    let gain = GUST_GAIN_MIN + rng.gen::<f32>() * GUST_GAIN_SPREAD;
    (cutoff, gain)
}

/// Maybe pick a chime note.
pub fn roll_chime<R: Rng + ?Sized>(rng: &mut R) -> Option<f32> {
    if rng.gen::<f32>() <= CHIME_THRESHOLD {
        return None;
    }
    let idx = ((rng.gen::<f32>() * CHIME_NOTES.len() as f32) as usize).min(CHIME_NOTES.len() - 1);
    Some(CHIME_NOTES[idx])
}

/// Maybe pick a creature call.
pub fn roll_creature<R: Rng + ?Sized>(rng: &mut R) -> Option<CreatureCall> {
    if rng.gen::<f32>() <= CREATURE_THRESHOLD {
        return None;
    }
    if rng.gen::<f32>() > CHIRP_THRESHOLD {
        Some(CreatureCall::Chirp {
            frequency: CHIRP_BASE_HZ + rng.gen::<f32>() * CHIRP_SPREAD_HZ,
        })
    } else {
        Some(CreatureCall::Croak {
            frequency: CROAK_BASE_HZ + rng.gen::<f32>() * CROAK_SPREAD_HZ,
        })
    }
}

// =============================================================================
// Trigger timers
// =============================================================================

/// How many times each trigger fired during one `tick`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DueTriggers {
    pub gusts: u32,
    pub chimes: u32,
    pub creatures: u32,
}

impl DueTriggers {
    pub fn is_empty(&self) -> bool {
        self.gusts == 0 && self.chimes == 0 && self.creatures == 0
    }
}

#[derive(Debug, Clone)]
pub struct LayerTriggers {
    wind: Timer,
    chimes: Timer,
    creatures: Timer,
}

impl Default for LayerTriggers {
    fn default() -> Self {
        Self {
            wind: Timer::from_seconds(WIND_INTERVAL_SECS, TimerMode::Repeating),
            chimes: Timer::from_seconds(CHIME_INTERVAL_SECS, TimerMode::Repeating),
            creatures: Timer::from_seconds(CREATURE_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

impl LayerTriggers {
    pub fn tick(&mut self, delta: Duration) -> DueTriggers {
        self.wind.tick(delta);
        self.chimes.tick(delta);
        self.creatures.tick(delta);
        DueTriggers {
            gusts: self.wind.times_finished_this_tick(),
            chimes: self.chimes.times_finished_this_tick(),
            creatures: self.creatures.times_finished_this_tick(),
        }
    }
}
