//! Pitch glide controllers.
//!
//! Both follow a target frequency with a one-pole lag and jump straight to
//! the target on a rising trigger edge, so a new phrase never glides in from
//! the previous one.

use crate::clock::RenderCtx;

/// Reference pitch (middle C) for the log-frequency domain.
const REFERENCE_HZ: f32 = 261.626;

/// Glide in octaves, so equal musical intervals take equal time.
pub struct Portamento {
    current: f32,
    gate: bool,
}

impl Portamento {
    pub fn new() -> Self {
        Self {
            current: 0.0,
            gate: false,
        }
    }

    /// `time` is the lag time constant in seconds; zero disables the glide.
    ///
    /// Non-positive frequencies have no logarithm; they pass through and
    /// leave the glide state untouched.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, trigger: bool, time: f32, ctx: &RenderCtx) -> f32 {
        if frequency <= 0.0 {
            return frequency;
        }
        let target = (frequency / REFERENCE_HZ).log2();
        let triggered = trigger && !self.gate;
        self.gate = trigger;

        if triggered || time == 0.0 {
            self.current = target;
            frequency
        } else {
            self.current = target + (self.current - target) * (-ctx.dtime() / time).exp();
            REFERENCE_HZ * self.current.exp2()
        }
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.gate = false;
    }
}

impl Default for Portamento {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaper glide in linear Hz with a fixed, precomputed time constant.
pub struct PortamentoLight {
    current: f32,
    gate: bool,
    decay: f32,
    time: f32,
}

impl PortamentoLight {
    pub fn new(time: f32, sample_rate: f32) -> Self {
        Self {
            current: 0.0,
            gate: false,
            decay: (-1.0 / (sample_rate * time)).exp(),
            time,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, trigger: bool) -> f32 {
        if (trigger && !self.gate) || self.time == 0.0 {
            self.current = frequency;
        } else {
            self.current = frequency + (self.current - frequency) * self.decay;
        }
        self.gate = trigger;
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.gate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn rising_edge_jumps_to_target() {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut porta = Portamento::new();
        let out = porta.next_sample(440.0, true, 0.1, &ctx);
        assert_eq!(out, 440.0);
    }

    #[test]
    fn held_note_glides_toward_new_pitch() {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut porta = Portamento::new();
        porta.next_sample(220.0, true, 0.05, &ctx);

        let first = porta.next_sample(440.0, true, 0.05, &ctx);
        assert!(first > 220.0 && first < 230.0, "expected a small first step, got {first}");

        let mut out = first;
        for _ in 0..48_000 {
            out = porta.next_sample(440.0, true, 0.05, &ctx);
        }
        assert!((out - 440.0).abs() < 0.01, "expected settle at 440, got {out}");
    }

    #[test]
    fn glide_is_half_way_in_octaves_after_ln2_time_constants() {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut porta = Portamento::new();
        let time = 0.01;
        porta.next_sample(220.0, true, time, &ctx);

        let steps = (time * std::f32::consts::LN_2 * SAMPLE_RATE).round() as usize;
        let mut out = 0.0;
        for _ in 0..steps {
            out = porta.next_sample(880.0, true, time, &ctx);
        }
        // Half of a two-octave glide is one octave: 440 Hz, not the linear midpoint.
        assert!((out - 440.0).abs() < 2.0, "expected ~440 Hz, got {out}");
    }

    #[test]
    fn silent_pitch_passes_through() {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut porta = Portamento::new();
        assert_eq!(porta.next_sample(0.0, false, 0.1, &ctx), 0.0);
        assert_eq!(porta.next_sample(440.0, true, 0.1, &ctx), 440.0);
    }

    #[test]
    fn zero_time_tracks_immediately() {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut porta = Portamento::new();
        porta.next_sample(220.0, true, 0.0, &ctx);
        assert_eq!(porta.next_sample(330.0, true, 0.0, &ctx), 330.0);
    }

    #[test]
    fn light_glides_linearly_in_hz() {
        let mut porta = PortamentoLight::new(0.01, SAMPLE_RATE);
        assert_eq!(porta.next_sample(200.0, true), 200.0);

        let steps = (0.01 * SAMPLE_RATE) as usize;
        let mut out = 0.0;
        for _ in 0..steps {
            out = porta.next_sample(400.0, true);
        }
        // One time constant covers 1 - 1/e of the distance.
        let expected = 400.0 - 200.0 * (-1.0f32).exp();
        assert!((out - expected).abs() < 0.5, "expected {expected}, got {out}");
    }

    #[test]
    fn light_retrigger_jumps() {
        let mut porta = PortamentoLight::new(0.5, SAMPLE_RATE);
        porta.next_sample(200.0, true);
        porta.next_sample(300.0, false);
        assert_eq!(porta.next_sample(500.0, true), 500.0);
    }
}
