//! Signal primitives: pink noise, oscillators and a low-pass biquad.

use std::f64::consts::TAU;

use rand::Rng;

/// Seconds of pink noise in the looping wind buffer.
pub const NOISE_BUFFER_SECS: u32 = 2;

/// Output scaling that keeps the filtered pink noise roughly inside [-1, 1].
const PINK_SCALE: f32 = 0.11;

// =============================================================================
// Pink noise
// =============================================================================

/// Fill a looping buffer with pink (1/f) noise using Paul Kellett's refined
/// filter bank over white noise.
pub fn pink_noise_buffer<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    let len = (sample_rate * NOISE_BUFFER_SECS) as usize;
    let mut b = [0.0f32; 7];
    let mut buffer = Vec::with_capacity(len);

    for _ in 0..len {
        let white = rng.gen::<f32>() * 2.0 - 1.0;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
        b[6] = white * 0.115926;
        buffer.push(pink * PINK_SCALE);
    }

    buffer
}

// =============================================================================
// Oscillator
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Phase-accumulating oscillator. Frequency is passed per sample so it can
/// follow an automated parameter.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    /// Normalised phase in [0, 1).
    phase: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let p = self.phase;
        let out = match self.waveform {
            Waveform::Sine => (p * TAU).sin() as f32,
            // Starts at zero and rises, like the sine.
            Waveform::Triangle => {
                let v = if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                };
                v as f32
            }
        };
        self.phase = (p + f64::from(frequency) / f64::from(sample_rate)).rem_euclid(1.0);
        out
    }
}

// =============================================================================
// Biquad low-pass
// =============================================================================

/// Butterworth Q for a two-pole low-pass.
const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Two-pole low-pass (RBJ cookbook), direct form I.
#[derive(Debug, Clone)]
pub struct LowPass {
    sample_rate: f64,
    cutoff: f32,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl LowPass {
    pub fn new(cutoff: f32, sample_rate: u32) -> Self {
        let mut filter = Self {
            sample_rate: f64::from(sample_rate.max(1)),
            cutoff: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.set_cutoff(cutoff);
        filter
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Recompute coefficients. Cheap no-op when the cutoff hasn't moved.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        let nyquist_guard = (self.sample_rate * 0.45) as f32;
        let cutoff = cutoff.clamp(10.0, nyquist_guard.max(10.0));
        if (cutoff - self.cutoff).abs() < f32::EPSILON {
            return;
        }
        self.cutoff = cutoff;

        let w0 = TAU * f64::from(cutoff) / self.sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * BUTTERWORTH_Q);
        let a0 = 1.0 + alpha;

        self.b0 = (1.0 - cos_w0) / 2.0 / a0;
        self.b1 = (1.0 - cos_w0) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let x0 = f64::from(input);
        let y0 = self.b0 * x0 + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;
        y0 as f32
    }
}
