//! The synthesis graph: continuous layers, one-shot voices and the master
//! gain, rendered sample by sample.
//!
//! ```text
//!  pink noise loop -> low-pass (cutoff param) -> wind gain ---+
//!  55 Hz sine ----------------------------------> drone gain -+
//!  chime voices -------------------------------> chime bus ---+--> master -> out
//!  creature voices -> low-pass 2 kHz ----------> creature bus +
//! ```
//!
//! Graph time advances only while rendering unsuspended, like an audio
//! context clock, so scheduled events stay put across a suspend.

use super::dsp::{LowPass, Oscillator, Waveform};
use super::layers::{
    AmbientLayer, CREATURE_FILTER_CUTOFF, DRONE_GAIN, DRONE_HZ, GUST_RAMP_SECS, WIND_BASE_CUTOFF,
    WIND_BASE_GAIN,
};
use super::param::AudioParam;
use super::voice::{Voice, VoiceBus};

/// Samples between recomputing the wind filter coefficients.
const CONTROL_BLOCK: u64 = 64;

/// Master gain approach time constant, in seconds.
pub const MASTER_TIME_CONSTANT: f64 = 0.5;

/// A fade-out suspends the graph after this many time constants (under 1%
/// of the starting level remains).
const FADE_OUT_TIME_CONSTANTS: f64 = 5.0;

struct WindLayer {
    noise: Vec<f32>,
    cursor: usize,
    filter: LowPass,
    cutoff: AudioParam,
    gain: AudioParam,
}

struct DroneLayer {
    osc: Oscillator,
}

pub struct SynthGraph {
    sample_rate: u32,
    /// Samples rendered while running.
    frame: u64,
    suspended: bool,
    /// Graph time at which a pending fade-out suspends output.
    suspend_at: Option<f64>,
    master: AudioParam,
    wind: WindLayer,
    drone: DroneLayer,
    creature_filter: LowPass,
    voices: Vec<Voice>,
}

impl SynthGraph {
    /// Build the graph with every continuous layer running and the master
    /// gain pinned at `master_level`.
    pub fn new(sample_rate: u32, noise: Vec<f32>, master_level: f32) -> Self {
        let sample_rate = sample_rate.max(1);
        Self {
            sample_rate,
            frame: 0,
            suspended: false,
            suspend_at: None,
            master: AudioParam::new(master_level),
            wind: WindLayer {
                noise,
                cursor: 0,
                filter: LowPass::new(WIND_BASE_CUTOFF, sample_rate),
                cutoff: AudioParam::new(WIND_BASE_CUTOFF),
                gain: AudioParam::new(WIND_BASE_GAIN),
            },
            drone: DroneLayer {
                osc: Oscillator::new(Waveform::Sine),
            },
            creature_filter: LowPass::new(CREATURE_FILTER_CUTOFF, sample_rate),
            voices: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Graph time in seconds.
    pub fn now(&self) -> f64 {
        self.frame as f64 / f64::from(self.sample_rate)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
        self.suspend_at = None;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
        self.suspend_at = None;
    }

    /// Ramp the master to silence, then suspend once the fade has run out.
    pub fn fade_out_and_suspend(&mut self) {
        self.ramp_master(0.0);
        self.suspend_at = Some(self.now() + MASTER_TIME_CONSTANT * FADE_OUT_TIME_CONSTANTS);
    }

    pub fn is_fading_out(&self) -> bool {
        self.suspend_at.is_some()
    }

    /// Start an exponential approach of the master gain toward `level` from
    /// wherever it currently is.
    pub fn ramp_master(&mut self, level: f32) {
        let now = self.now();
        self.master.cancel_and_hold_at_time(now);
        self.master.set_target_at_time(level, now, MASTER_TIME_CONSTANT);
    }

    pub fn master_level(&self) -> f32 {
        self.master.value_at(self.now())
    }

    pub fn master_level_at(&self, t: f64) -> f32 {
        self.master.value_at(t)
    }

    /// Ramp the wind toward new targets over the gust duration.
    pub fn schedule_gust(&mut self, cutoff: f32, gain: f32) {
        let now = self.now();
        let end = now + GUST_RAMP_SECS;
        self.wind.cutoff.cancel_and_hold_at_time(now);
        self.wind.cutoff.exponential_ramp_to_value_at_time(cutoff, end);
        self.wind.gain.cancel_and_hold_at_time(now);
        self.wind.gain.linear_ramp_to_value_at_time(gain, end);
    }

    pub fn wind_cutoff_at(&self, t: f64) -> f32 {
        self.wind.cutoff.value_at(t)
    }

    pub fn wind_gain_at(&self, t: f64) -> f32 {
        self.wind.gain.value_at(t)
    }

    pub fn add_voice(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    /// Voices that have not reached their stop time yet.
    pub fn active_voices(&self, layer: AmbientLayer) -> usize {
        let bus = match layer {
            AmbientLayer::Chimes => VoiceBus::Chimes,
            AmbientLayer::Creatures => VoiceBus::Creatures,
            AmbientLayer::Wind | AmbientLayer::Drone => return 0,
        };
        self.voices.iter().filter(|v| v.bus() == bus).count()
    }

    /// Fill `out` with mono samples. While suspended the output is silent and
    /// graph time does not move.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.suspended {
            out.fill(0.0);
            return;
        }
        for i in 0..out.len() {
            if self.suspend_at.is_some_and(|at| self.now() >= at) {
                self.suspend();
                out[i..].fill(0.0);
                return;
            }
            if self.frame % CONTROL_BLOCK == 0 {
                self.control_update();
            }
            out[i] = self.next_sample();
            self.frame += 1;
        }
    }

    /// Per-block housekeeping: filter coefficients, finished voices, history.
    fn control_update(&mut self) {
        let now = self.now();
        let cutoff = self.wind.cutoff.value_at(now);
        self.wind.filter.set_cutoff(cutoff);
        self.voices.retain(|v| !v.is_finished(now));
        self.master.prune(now);
        self.wind.cutoff.prune(now);
        self.wind.gain.prune(now);
    }

    fn next_sample(&mut self) -> f32 {
        let t = self.now();
        let sr = self.sample_rate as f32;

        let wind = if self.wind.noise.is_empty() {
            0.0
        } else {
            let raw = self.wind.noise[self.wind.cursor];
            self.wind.cursor = (self.wind.cursor + 1) % self.wind.noise.len();
            self.wind.filter.process(raw) * self.wind.gain.value_at(t)
        };

        let drone = self.drone.osc.next_sample(DRONE_HZ, sr) * DRONE_GAIN;

        let mut chimes = 0.0;
        let mut creatures = 0.0;
        for voice in &mut self.voices {
            let s = voice.next_sample(t, sr);
            match voice.bus() {
                VoiceBus::Chimes => chimes += s,
                VoiceBus::Creatures => creatures += s,
            }
        }
        let creatures = self.creature_filter.process(creatures);

        let mixed = (wind + drone + chimes + creatures) * self.master.value_at(t);
        mixed.clamp(-1.0, 1.0)
    }
}
