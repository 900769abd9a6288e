//! Three-piece drum machine driven by rhythm patterns.
//!
//! Track 0 is the kick, track 1 the snare, track 2 the closed hi-hat.
//! Extra tracks in a score are ignored.
//!
//! # How It Works
//!
//! - Kick: sine whose pitch falls from ~150 Hz to 50 Hz on a fast
//!   exponential envelope, shaped by a slower amplitude decay
//! - Snare: band-passed noise plus a short 180 Hz body
//! - Hat: high-passed noise with a very short decay
//! - A little random-echo reverb on the mix for room
//!
//! Accented hits play at full level, others at 0.6.

use crate::{
    clock::RenderCtx,
    dsp::{
        envelope::{AttackDecayEnvelope, DecayEnvelope},
        filter::Biquad,
        oscillator::Oscillator,
        reverb::RandomReverb,
    },
    host::{AudioBlock, Renderer},
    sequencing::{CompileError, PlayOptions, Rhythm, Ticker},
};

pub const KICK: usize = 0;
pub const SNARE: usize = 1;
pub const HAT: usize = 2;

const ACCENT_GAIN: f32 = 1.0;
const NORMAL_GAIN: f32 = 0.6;
const REVERB_SEND: f32 = 0.15;

struct Kick {
    osc: Oscillator,
    pitch: DecayEnvelope,
    amp: AttackDecayEnvelope,
}

impl Kick {
    fn new(sample_rate: f32) -> Self {
        Self {
            osc: Oscillator::sine(),
            pitch: DecayEnvelope::new(0.03, sample_rate),
            amp: AttackDecayEnvelope::new(0.001, 0.35, sample_rate),
        }
    }

    #[inline]
    fn next_sample(&mut self, trigger: bool, ctx: &RenderCtx) -> f32 {
        if trigger && !self.amp_active() {
            self.osc.reset();
        }
        let frequency = 50.0 + 100.0 * self.pitch.next_sample(trigger);
        self.osc.next_sample(frequency, ctx) * self.amp.next_sample(trigger)
    }

    fn amp_active(&self) -> bool {
        self.amp.level() > 0.0
    }
}

struct Snare {
    noise: Oscillator,
    body: Oscillator,
    band: Biquad,
    env: DecayEnvelope,
}

impl Snare {
    fn new(sample_rate: f32) -> Self {
        Self {
            noise: Oscillator::noise().with_seed(0x5EED_0001),
            body: Oscillator::triangle(),
            band: Biquad::bandpass(),
            env: DecayEnvelope::new(0.18, sample_rate),
        }
    }

    #[inline]
    fn next_sample(&mut self, trigger: bool, ctx: &RenderCtx) -> f32 {
        let level = self.env.next_sample(trigger);
        let noise = self.band.next_sample(self.noise.next_sample(0.0, ctx), 1_800.0, 0.8, ctx);
        (noise * 0.8 + self.body.next_sample(180.0, ctx) * 0.4) * level
    }
}

struct Hat {
    noise: Oscillator,
    high: Biquad,
    env: DecayEnvelope,
}

impl Hat {
    fn new(sample_rate: f32) -> Self {
        Self {
            noise: Oscillator::noise().with_seed(0x5EED_0002),
            high: Biquad::highpass(),
            env: DecayEnvelope::new(0.04, sample_rate),
        }
    }

    #[inline]
    fn next_sample(&mut self, trigger: bool, ctx: &RenderCtx) -> f32 {
        let level = self.env.next_sample(trigger);
        self.high.next_sample(self.noise.next_sample(0.0, ctx), 7_000.0, 0.707, ctx) * level * 0.5
    }
}

pub struct RhythmDrums {
    ticker: Ticker,
    rhythm: Rhythm,
    kick: Kick,
    snare: Snare,
    hat: Hat,
    reverb: RandomReverb,
    /// Gain latched at each hit, per track.
    gains: [f32; 3],
}

impl RhythmDrums {
    pub fn new(bpm: f64, sample_rate: f32) -> Self {
        Self {
            ticker: Ticker::new(bpm, 0.0, sample_rate),
            rhythm: Rhythm::new(),
            kick: Kick::new(sample_rate),
            snare: Snare::new(sample_rate),
            hat: Hat::new(sample_rate),
            reverb: RandomReverb::new(0.01, 0.2, 24, 0.4, sample_rate),
            gains: [NORMAL_GAIN; 3],
        }
    }

    /// Compile and install `[kick, snare, hat]` patterns.
    pub fn score<S: AsRef<str>>(&mut self, patterns: &[S], options: PlayOptions) -> Result<(), CompileError> {
        self.rhythm.score(patterns, options)
    }

    pub fn rhythm(&self) -> &Rhythm {
        &self.rhythm
    }

    pub fn rhythm_mut(&mut self) -> &mut Rhythm {
        &mut self.rhythm
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let tick = self.ticker.next_tick();
        self.rhythm.play(tick);

        for (track, gain) in self.gains.iter_mut().enumerate() {
            if self.rhythm.trigger(track) {
                *gain = if self.rhythm.accent(track) { ACCENT_GAIN } else { NORMAL_GAIN };
            }
        }

        let dry = self.kick.next_sample(self.rhythm.trigger(KICK), ctx) * self.gains[KICK]
            + self.snare.next_sample(self.rhythm.trigger(SNARE), ctx) * self.gains[SNARE]
            + self.hat.next_sample(self.rhythm.trigger(HAT), ctx) * self.gains[HAT];

        dry + self.reverb.process(dry * REVERB_SEND)
    }
}

impl Renderer for RhythmDrums {
    fn render(&mut self, mut block: AudioBlock<'_>, ctx: &RenderCtx) {
        for frame in 0..block.frames {
            let value = self.next_sample(ctx);
            block.set_frame(frame, value);
        }
    }
}
