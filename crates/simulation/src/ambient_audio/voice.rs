//! Short-lived one-shot voices: chime notes and creature calls.
//!
//! A voice owns an oscillator plus frequency and gain envelopes, all scheduled
//! up front at creation. It is audible from `start` until `stop`, after which
//! the graph drops it.

use super::dsp::{Oscillator, Waveform};
use super::param::AudioParam;

// =============================================================================
// Envelope constants
// =============================================================================

/// Pentatonic chime pitches in Hz (C5 E5 G5 B5 D6).
pub const CHIME_NOTES: [f32; 5] = [523.25, 659.25, 783.99, 987.77, 1174.66];
const CHIME_PEAK: f32 = 0.08;
const CHIME_ATTACK: f64 = 0.1;
const CHIME_RELEASE_END: f64 = 4.0;
const CHIME_STOP: f64 = 4.1;

/// Gain floor for exponential fades.
const FADE_FLOOR: f32 = 0.001;

pub const CHIRP_BASE_HZ: f32 = 1500.0;
pub const CHIRP_SPREAD_HZ: f32 = 1000.0;
const CHIRP_PITCH_DROP: f32 = 0.6;
const CHIRP_PITCH_TIME: f64 = 0.15;
const CHIRP_PEAK: f32 = 0.12;
const CHIRP_ATTACK: f64 = 0.02;
const CHIRP_RELEASE_END: f64 = 0.3;
const CHIRP_STOP: f64 = 0.4;

pub const CROAK_BASE_HZ: f32 = 150.0;
pub const CROAK_SPREAD_HZ: f32 = 100.0;
const CROAK_PITCH_RISE: f32 = 1.2;
const CROAK_RISE_TIME: f64 = 0.1;
const CROAK_FALL_TIME: f64 = 0.3;
const CROAK_PEAK: f32 = 0.18;
const CROAK_ATTACK: f64 = 0.05;
const CROAK_RELEASE_END: f64 = 0.5;
const CROAK_STOP: f64 = 0.6;

// =============================================================================
// Voice
// =============================================================================

/// Which bus a voice is mixed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceBus {
    Chimes,
    Creatures,
}

/// Which creature call a voice imitates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreatureCall {
    /// High, short and falling, bird-like.
    Chirp { frequency: f32 },
    /// Low with a pitch wobble, frog-like.
    Croak { frequency: f32 },
}

#[derive(Debug, Clone)]
pub struct Voice {
    bus: VoiceBus,
    osc: Oscillator,
    frequency: AudioParam,
    gain: AudioParam,
    start: f64,
    stop: f64,
}

impl Voice {
    /// A soft triangle-wave bell note starting at `at`.
    pub fn chime(note: f32, at: f64) -> Self {
        let frequency = AudioParam::new(note);
        let mut gain = AudioParam::new(0.0);
        gain.set_value_at_time(0.0, at);
        gain.linear_ramp_to_value_at_time(CHIME_PEAK, at + CHIME_ATTACK);
        gain.exponential_ramp_to_value_at_time(FADE_FLOOR, at + CHIME_RELEASE_END);

        Self {
            bus: VoiceBus::Chimes,
            osc: Oscillator::new(Waveform::Triangle),
            frequency,
            gain,
            start: at,
            stop: at + CHIME_STOP,
        }
    }

    pub fn creature(call: CreatureCall, at: f64) -> Self {
        match call {
            CreatureCall::Chirp { frequency: f } => {
                let mut frequency = AudioParam::new(f);
                frequency.set_value_at_time(f, at);
                frequency.exponential_ramp_to_value_at_time(f * CHIRP_PITCH_DROP, at + CHIRP_PITCH_TIME);

                let mut gain = AudioParam::new(0.0);
                gain.set_value_at_time(0.0, at);
                gain.linear_ramp_to_value_at_time(CHIRP_PEAK, at + CHIRP_ATTACK);
                gain.exponential_ramp_to_value_at_time(FADE_FLOOR, at + CHIRP_RELEASE_END);

                Self {
                    bus: VoiceBus::Creatures,
                    osc: Oscillator::new(Waveform::Sine),
                    frequency,
                    gain,
                    start: at,
                    stop: at + CHIRP_STOP,
                }
            }
            CreatureCall::Croak { frequency: f } => {
                let mut frequency = AudioParam::new(f);
                frequency.set_value_at_time(f, at);
                frequency.linear_ramp_to_value_at_time(f * CROAK_PITCH_RISE, at + CROAK_RISE_TIME);
                frequency.linear_ramp_to_value_at_time(f, at + CROAK_FALL_TIME);

                let mut gain = AudioParam::new(0.0);
                gain.set_value_at_time(0.0, at);
                gain.linear_ramp_to_value_at_time(CROAK_PEAK, at + CROAK_ATTACK);
                gain.exponential_ramp_to_value_at_time(FADE_FLOOR, at + CROAK_RELEASE_END);

                Self {
                    bus: VoiceBus::Creatures,
                    osc: Oscillator::new(Waveform::Triangle),
                    frequency,
                    gain,
                    start: at,
                    stop: at + CROAK_STOP,
                }
            }
        }
    }

    pub fn bus(&self) -> VoiceBus {
        self.bus
    }

    pub fn stop_time(&self) -> f64 {
        self.stop
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.stop
    }

    pub fn gain_at(&self, t: f64) -> f32 {
        self.gain.value_at(t)
    }

    pub fn frequency_at(&self, t: f64) -> f32 {
        self.frequency.value_at(t)
    }

    /// Next output sample at graph time `t`. Silent outside `[start, stop)`.
    pub fn next_sample(&mut self, t: f64, sample_rate: f32) -> f32 {
        if t < self.start || t >= self.stop {
            return 0.0;
        }
        let freq = self.frequency.value_at(t);
        self.osc.next_sample(freq, sample_rate) * self.gain.value_at(t)
    }
}
