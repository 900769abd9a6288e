//! Reverb - Sparse Random Echoes
//!
//! Instead of a network of comb and allpass filters, this reverb scatters a
//! fixed number of echo taps at random positions inside a time window and
//! feeds part of their sum back into the delay line.
//!
//! ```text
//!          ┌────────────── feedback ───────────────┐
//!          ↓                                        │
//! Input ──(+)──→ [ring buffer] ──→ tap 0 ─┐         │
//!                               ──→ tap 1 ─┼──→ (Σ) ─┴──→ Output (wet)
//!                               ──→ tap n ─┘
//! ```
//!
//! # Taps
//!
//! Each tap `i` gets a delay time `start + r * length` with `r` uniform in
//! [0, 1), and a gain that falls with its delay:
//!
//! ```text
//! gain = (1 / density) ^ (delay_time / (start + length))
//! ```
//!
//! so the last possible echo is attenuated by a factor of `density`. Gains
//! alternate in sign by tap index to keep the tail from building up DC.
//!
//! # Per Sample
//!
//! ```text
//! wet  = Σ gain[i] * x[n - delay[i]]
//! push   (1 - feedback) * input + feedback * wet
//! ```
//!
//! Only the wet signal is returned; mix it with the dry input yourself.
//! Taps and the delay line are allocated at construction. Processing never
//! allocates.

use super::noise::XorShift32;
use super::ring_buffer::RingBuffer;

/// Seed used by [`RandomReverb::new`]. Same parameters, same room.
const DEFAULT_SEED: u32 = 0x2545_F491;

#[derive(Debug, Clone, Copy)]
struct Tap {
    /// Delay in samples, at least 1.
    delay: usize,
    gain: f32,
}

pub struct RandomReverb {
    ring: RingBuffer,
    taps: Vec<Tap>,
    feedback: f32,
}

impl RandomReverb {
    /// * `start` - earliest echo (seconds)
    /// * `length` - width of the echo window after `start` (seconds)
    /// * `density` - number of echo taps
    /// * `feedback` - share of the wet signal fed back into the delay line
    pub fn new(start: f32, length: f32, density: usize, feedback: f32, sample_rate: f32) -> Self {
        Self::new_seeded(start, length, density, feedback, sample_rate, DEFAULT_SEED)
    }

    pub fn new_seeded(
        start: f32,
        length: f32,
        density: usize,
        feedback: f32,
        sample_rate: f32,
        seed: u32,
    ) -> Self {
        let window = start + length;
        let max_samples = (window * sample_rate).ceil().max(1.0) as usize;
        let mut rng = XorShift32::new(seed);
        let base = 1.0 / density.max(1) as f32;

        let taps = (0..density)
            .map(|i| {
                let delay_time = rng.next_unit() * length + start;
                let delay = ((delay_time * sample_rate).ceil() as usize).clamp(1, max_samples);
                let gain = base.powf(delay_time / window);
                Tap {
                    delay,
                    gain: if i % 2 == 0 { gain } else { -gain },
                }
            })
            .collect();

        Self {
            ring: RingBuffer::new(max_samples),
            taps,
            feedback,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn density(&self) -> usize {
        self.taps.len()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut wet = 0.0;
        for tap in &self.taps {
            wet += tap.gain * self.ring.get(tap.delay - 1);
        }
        self.ring.push((1.0 - self.feedback) * input + self.feedback * wet);
        wet
    }

    /// Replace a buffer with its wet signal.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ring.clear();
    }
}
