use crate::{clock::RenderCtx, MIN_STAGE_TIME};

/*
Envelope Generators
===================

Three envelope shapes, all driven by a boolean gate sampled once per frame.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). Multiply
              it with a signal to shape amplitude, or scale a cutoff with it.

  gate        The note on/off signal. For the ADSR it is level-sensitive
              (held = attack/decay/sustain, released = release). The
              exponential shapes only react to its rising edge.

  start level The level captured at the last gate change. Every ramp begins
              here, so retriggering mid-release continues from where the
              sound is instead of snapping to zero.


ADSR: Piecewise-Linear Ramps
----------------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Time since the last gate change (`elapsed`) selects the segment:

    gated:     elapsed <= A        start + (1 - start) * elapsed / A
               elapsed <  A + D    1 - (1 - S) * (elapsed - A) / D
               otherwise           S
    released:  elapsed <  R        start - start * elapsed / R
               otherwise           0

Slopes are recomputed from the start level at every gate change. Stage
durations below MIN_STAGE_TIME are raised to it.


Exponential: Capacitor Charge and Discharge
-------------------------------------------

An RC circuit discharges by the same ratio every sample:

    level[n + 1] = level[n] * ratio,   ratio = 10^(-1 / (time * sample_rate))

`time` is the time to fall one decade (x 0.1, i.e. -20 dB). Charging works
on the remaining distance to 1.0 the same way. Once a decaying level drops
under SILENCE it is snapped to exactly zero so it never crawls through the
denormal range.
*/

/// Below this an exponential envelope is considered silent.
const SILENCE: f32 = 1e-5;
/// Attack ends once the remaining distance to full level is under this.
const ATTACK_PEAK_EPSILON: f32 = 1e-3;

/// The current stage of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Adsr {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    gate: bool,
    stage: EnvelopeStage,
    level: f32,
    start_level: f32,
    elapsed: f64,

    attack_slope: f32,
    decay_slope: f32,
    release_slope: f32,
}

impl Adsr {
    /// Times in seconds, sustain as a level (0.0 - 1.0).
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let attack = attack.max(MIN_STAGE_TIME);
        let decay = decay.max(MIN_STAGE_TIME);
        let release = release.max(MIN_STAGE_TIME);

        Self {
            attack,
            decay,
            sustain,
            release,

            gate: false,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            start_level: 0.0,
            elapsed: 0.0,

            attack_slope: 1.0 / attack,
            decay_slope: -(1.0 - sustain) / decay,
            release_slope: 0.0,
        }
    }

    /// Advance one sample. Called once per sample with the current gate.
    #[inline]
    pub fn next_sample(&mut self, gate: bool, ctx: &RenderCtx) -> f32 {
        if gate != self.gate {
            self.gate = gate;
            self.start_level = self.level;
            self.attack_slope = (1.0 - self.start_level) / self.attack;
            self.release_slope = -self.start_level / self.release;
            self.elapsed = 0.0;
        }

        let elapsed = self.elapsed as f32;
        if self.gate {
            if elapsed <= self.attack {
                self.level = self.attack_slope * elapsed + self.start_level;
                self.stage = EnvelopeStage::Attack;
            } else if elapsed < self.attack + self.decay {
                self.level = self.decay_slope * (elapsed - self.attack) + 1.0;
                self.stage = EnvelopeStage::Decay;
            } else {
                self.level = self.sustain;
                self.stage = EnvelopeStage::Sustain;
            }
        } else if elapsed < self.release && self.start_level != 0.0 {
            self.level = self.release_slope * elapsed + self.start_level;
            self.stage = EnvelopeStage::Release;
        } else {
            self.level = 0.0;
            self.stage = EnvelopeStage::Idle;
        }

        self.elapsed += ctx.dtime() as f64;
        self.level
    }

    /// Render a block of envelope values with a constant gate.
    pub fn render(&mut self, buffer: &mut [f32], gate: bool, ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(gate, ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn reset(&mut self) {
        self.gate = false;
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.start_level = 0.0;
        self.elapsed = 0.0;
    }
}

/// Per-sample ratio that shrinks a value by one decade over `time` seconds.
#[inline]
fn decade_ratio(time: f32, sample_rate: f32) -> f32 {
    10.0_f32.powf(-1.0 / (time.max(MIN_STAGE_TIME) * sample_rate))
}

/// Percussive exponential decay, restarted at full level on each trigger.
pub struct DecayEnvelope {
    ratio: f32,
    level: f32,
    gate: bool,
}

impl DecayEnvelope {
    /// `decay` is the time (seconds) to fall by one decade.
    pub fn new(decay: f32, sample_rate: f32) -> Self {
        Self {
            ratio: decade_ratio(decay, sample_rate),
            level: 0.0,
            gate: false,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, trigger: bool) -> f32 {
        if trigger && !self.gate {
            self.level = 1.0;
        } else {
            self.level *= self.ratio;
            if self.level < SILENCE {
                self.level = 0.0;
            }
        }
        self.gate = trigger;
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.level > 0.0
    }
}

/// Exponential charge to full level followed by exponential decay.
pub struct AttackDecayEnvelope {
    attack_ratio: f32,
    decay_ratio: f32,
    stage: EnvelopeStage,
    level: f32,
    gate: bool,
}

impl AttackDecayEnvelope {
    /// Both times are time-per-decade in seconds.
    pub fn new(attack: f32, decay: f32, sample_rate: f32) -> Self {
        Self {
            attack_ratio: decade_ratio(attack, sample_rate),
            decay_ratio: decade_ratio(decay, sample_rate),
            stage: EnvelopeStage::Idle,
            level: 0.0,
            gate: false,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, trigger: bool) -> f32 {
        if trigger && !self.gate {
            self.stage = EnvelopeStage::Attack;
        }
        self.gate = trigger;

        match self.stage {
            EnvelopeStage::Attack => {
                self.level = 1.0 - (1.0 - self.level) * self.attack_ratio;
                if 1.0 - self.level < ATTACK_PEAK_EPSILON {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level *= self.decay_ratio;
                if self.level < SILENCE {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
            _ => {}
        }

        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
