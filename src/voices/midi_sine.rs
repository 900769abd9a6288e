//! Monophonic MIDI sine lead.
//!
//! Plays whatever key the note stack says is sounding, gliding between
//! keys played legato.
//!
//! # How It Works
//!
//! 1. `MonoParser` reads the block's packets: note, velocity, bend, mod wheel
//! 2. Light portamento on the bent frequency
//! 3. Sine oscillator, overdriven by the mod wheel and clipped to ±1
//! 4. ADSR on the key gate, scaled by a velocity curve `(10^v - 1) / 9`

use crate::{
    clock::RenderCtx,
    dsp::{envelope::Adsr, oscillator::Oscillator, portamento::PortamentoLight},
    host::{AudioBlock, Renderer},
    io::mono::MonoParser,
};

const GLIDE_TIME: f32 = 0.02;

pub struct MidiSine {
    parser: MonoParser,
    glide: PortamentoLight,
    osc: Oscillator,
    env: Adsr,
    /// Velocity gain of the current phrase, held through the release.
    gain: f32,
}

impl MidiSine {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_parser(MonoParser::new(), sample_rate)
    }

    /// Use a parser with its own channel filter, bend range or tuning.
    pub fn with_parser(parser: MonoParser, sample_rate: f32) -> Self {
        Self {
            parser,
            glide: PortamentoLight::new(GLIDE_TIME, sample_rate),
            osc: Oscillator::sine(),
            env: Adsr::new(0.005, 0.1, 0.8, 0.3),
            gain: 0.0,
        }
    }

    pub fn parser(&self) -> &MonoParser {
        &self.parser
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let gate = self.parser.gate();
        if gate {
            self.gain = velocity_curve(self.parser.velocity());
        }

        let frequency = self.glide.next_sample(self.parser.frequency(), gate);
        let drive = 1.0 + self.parser.modulation();
        let value = (self.osc.next_sample(frequency, ctx) * drive).clamp(-1.0, 1.0);
        value * self.env.next_sample(gate, ctx) * self.gain
    }
}

fn velocity_curve(velocity: f32) -> f32 {
    (10.0_f32.powf(velocity) - 1.0) / 9.0
}

impl Renderer for MidiSine {
    fn render(&mut self, mut block: AudioBlock<'_>, ctx: &RenderCtx) {
        self.parser.parse(block.midi);
        for frame in 0..block.frames {
            let value = self.next_sample(ctx);
            block.set_frame(frame, value);
        }
    }
}
