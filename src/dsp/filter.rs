use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::RenderCtx;

/*
| type       | struct  | passes          | rejects         |
| ---------- | ------- | --------------- | --------------- |
| low-pass   | SvFilter| below cutoff    | above cutoff    |
| low-pass   | Biquad  | below cutoff    | above cutoff    |
| high-pass  | Biquad  | above cutoff    | below cutoff    |
| band-pass  | Biquad  | around center   | both sides      |

Both filters take cutoff and resonance/Q on every call so they can be swept
per sample. Q <= 0 or negative resonance is outside the contract and is not
checked on the hot path.
*/

/// Two-integrator low-pass with resonance feedback.
///
/// The coefficient is clamped at a quarter of the sample rate; above that
/// the difference equation stops being stable.
pub struct SvFilter {
    buf0: f32,
    buf1: f32,
}

impl SvFilter {
    pub fn new() -> Self {
        Self {
            buf0: 0.0,
            buf1: 0.0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32, cutoff_hz: f32, resonance: f32, ctx: &RenderCtx) -> f32 {
        let f = 2.0 * (PI * (cutoff_hz / ctx.sample_rate).min(0.25)).sin();
        self.buf0 += f * (input - self.buf0 + resonance * (self.buf0 - self.buf1));
        self.buf1 += f * (self.buf0 - self.buf1);
        self.buf1
    }

    pub fn reset(&mut self) {
        self.buf0 = 0.0;
        self.buf1 = 0.0;
    }
}

impl Default for SvFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadType {
    LowPass,
    HighPass,
    BandPass,
}

/// Direct form I biquad with cookbook coefficients, recomputed per sample.
pub struct Biquad {
    filter_type: BiquadType,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(filter_type: BiquadType) -> Self {
        Self {
            filter_type,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn lowpass() -> Self {
        Self::new(BiquadType::LowPass)
    }

    pub fn highpass() -> Self {
        Self::new(BiquadType::HighPass)
    }

    pub fn bandpass() -> Self {
        Self::new(BiquadType::BandPass)
    }

    pub fn filter_type(&self) -> BiquadType {
        self.filter_type
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32, frequency: f32, q: f32, ctx: &RenderCtx) -> f32 {
        let w0 = frequency * TAU / ctx.sample_rate;
        let cs = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let (b0, b1, b2) = match self.filter_type {
            BiquadType::LowPass => {
                let b1 = 1.0 - cs;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            BiquadType::HighPass => {
                let b0 = (1.0 + cs) / 2.0;
                (b0, -(1.0 + cs), b0)
            }
            BiquadType::BandPass => (alpha, 0.0, -alpha),
        };

        let y = (b0 * input + b1 * self.x1 + b2 * self.x2 + 2.0 * cs * self.y1
            - (1.0 - alpha) * self.y2)
            / (1.0 + alpha);

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    /// Filter a buffer in place at a fixed frequency and Q.
    pub fn render(&mut self, buffer: &mut [f32], frequency: f32, q: f32, ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, frequency, q, ctx);
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
