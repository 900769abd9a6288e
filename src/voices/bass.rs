//! MML-driven square bass.
//!
//! A tempo clock feeds the melodic sequencer, and the sequencer's pitch,
//! gate and accent drive a small subtractive patch.
//!
//! # How It Works
//!
//! 1. Ticker turns frames into ticks, `Mml::play` updates pitch and gate
//! 2. Portamento glides between legato-tied notes
//! 3. Square oscillator through a resonant low-pass that opens with the envelope
//! 4. ADSR amplitude, accented notes at full level, others at 0.8
//!
//! # Variations
//!
//! - Zero glide time = hard pitch steps even on ties
//! - Higher resonance = squelchier acid line

use crate::{
    clock::RenderCtx,
    dsp::{envelope::Adsr, filter::SvFilter, oscillator::Oscillator, portamento::Portamento},
    host::{AudioBlock, Renderer},
    sequencing::{CompileError, Mml, PlayOptions, Ticker},
};

const ACCENT_GAIN: f32 = 1.0;
const NORMAL_GAIN: f32 = 0.8;
const GLIDE_TIME: f32 = 0.03;
const BASE_CUTOFF: f32 = 300.0;
const ENV_CUTOFF: f32 = 3_000.0;
const RESONANCE: f32 = 0.3;

pub struct MmlBass {
    ticker: Ticker,
    mml: Mml,
    glide: Portamento,
    osc: Oscillator,
    filter: SvFilter,
    env: Adsr,
}

impl MmlBass {
    pub fn new(bpm: f64, sample_rate: f32) -> Self {
        Self {
            ticker: Ticker::new(bpm, 0.0, sample_rate),
            mml: Mml::default(),
            glide: Portamento::new(),
            osc: Oscillator::square(),
            filter: SvFilter::new(),
            env: Adsr::new(0.001, 0.4, 0.6, 0.2),
        }
    }

    /// Compile and install a score.
    pub fn score(&mut self, mml: &str, options: PlayOptions) -> Result<(), CompileError> {
        self.mml.score(mml, options)
    }

    pub fn mml(&self) -> &Mml {
        &self.mml
    }

    pub fn mml_mut(&mut self) -> &mut Mml {
        &mut self.mml
    }

    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let tick = self.ticker.next_tick();
        self.mml.play(tick);

        let trigger = self.mml.trigger();
        let frequency = self.glide.next_sample(self.mml.frequency(), trigger, GLIDE_TIME, ctx);
        let level = self.env.next_sample(trigger, ctx);

        let raw = self.osc.next_sample(frequency, ctx);
        let cutoff = BASE_CUTOFF + ENV_CUTOFF * level;
        let filtered = self.filter.next_sample(raw, cutoff, RESONANCE, ctx);

        let gain = if self.mml.accent() { ACCENT_GAIN } else { NORMAL_GAIN };
        filtered * level * gain
    }
}

impl Renderer for MmlBass {
    fn render(&mut self, mut block: AudioBlock<'_>, ctx: &RenderCtx) {
        for frame in 0..block.frames {
            let value = self.next_sample(ctx);
            block.set_frame(frame, value);
        }
    }
}
