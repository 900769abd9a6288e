#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::RenderCtx;
use crate::dsp::noise::XorShift32;
use std::f32::consts::TAU;

/*
Phase-Accumulator Oscillators
=============================

Every periodic waveform here is a function of a single number, the phase,
which runs from 0.0 up to (but not including) 1.0 once per cycle:

    phase += frequency / sample_rate      (then wrap back into [0, 1))

Because the increment is recomputed every call, the frequency can change
from one sample to the next (vibrato, portamento, FM) without clicks.

    phase   0.0        0.25       0.5        0.75       1.0
            |----------|----------|----------|----------|
    sine    0    ↗     1    ↘     0    ↘    -1    ↗     0
    square  +1 ─────────────────── -1 ───────────────────
    tri     0    ↗     1    ↘     0    ↘    -1    ↗     0
    saw     0    ↘    -0.5  ↘    -1 | +1   ↘    +0.5  ↘ 0

Shape parameters
----------------

  Pulse   width: fraction of the cycle spent at +1 (0.5 = square).

  TriSaw  morph: where the peak sits inside the cycle.
            0.0  falling saw   (+1 → -1 over the whole cycle)
            0.5  triangle
            1.0  rising saw    (-1 → +1 over the whole cycle)
          The end points are evaluated with their own closed forms; the
          general formula divides by morph and by (1 - morph).

Noise ignores frequency and phase entirely.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    Pulse,
    Triangle,
    TriSaw,
    Saw,
    Noise,
    Mute,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    shape: f32,
    rng: XorShift32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            shape: 0.5,
            rng: XorShift32::default(),
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    /// Square with variable pulse width (0.0 - 1.0).
    pub fn pulse(width: f32) -> Self {
        Self::new(Waveform::Pulse).with_shape(width)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    /// Triangle/saw morph: 0.0 (falling saw) .. 0.5 (triangle) .. 1.0 (rising saw).
    pub fn tri_saw(morph: f32) -> Self {
        Self::new(Waveform::TriSaw).with_shape(morph)
    }

    pub fn saw() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn noise() -> Self {
        Self::new(Waveform::Noise)
    }

    pub fn mute() -> Self {
        Self::new(Waveform::Mute)
    }

    pub fn with_shape(mut self, shape: f32) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = XorShift32::new(seed);
        self
    }

    pub fn set_shape(&mut self, shape: f32) {
        self.shape = shape;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance one sample using the stored shape parameter.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, ctx: &RenderCtx) -> f32 {
        self.next_shaped(frequency, self.shape, ctx)
    }

    /// Advance one sample with a per-call shape (pulse width or morph).
    #[inline]
    pub fn next_shaped(&mut self, frequency: f32, shape: f32, ctx: &RenderCtx) -> f32 {
        match self.waveform {
            Waveform::Noise => return self.rng.next_bipolar(),
            Waveform::Mute => return 0.0,
            _ => {}
        }

        self.phase = (self.phase + frequency * ctx.dtime()) % 1.0;
        let p = self.phase;

        match self.waveform {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Pulse => {
                if p < shape {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    -4.0 * p + 2.0
                } else {
                    4.0 * p - 4.0
                }
            }
            Waveform::TriSaw => tri_saw(p, shape),
            Waveform::Saw => {
                if p < 0.5 {
                    -2.0 * p
                } else {
                    -2.0 * p + 2.0
                }
            }
            Waveform::Noise | Waveform::Mute => unreachable!("handled before phase update"),
        }
    }

    /// Fill a buffer at a fixed frequency.
    pub fn render(&mut self, buffer: &mut [f32], frequency: f32, ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(frequency, ctx);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[inline]
fn tri_saw(p: f32, morph: f32) -> f32 {
    if morph == 0.0 {
        -2.0 * (p - 0.5)
    } else if morph == 1.0 {
        if p < 0.5 {
            2.0 * p
        } else {
            2.0 * (p - 1.0)
        }
    } else {
        let half = morph / 2.0;
        if p < half {
            p / half
        } else if p < 1.0 - half {
            (p - 0.5) * -2.0 / (1.0 - morph)
        } else {
            (p - 1.0) / half
        }
    }
}
