//! Low-level DSP primitives.
//!
//! Each primitive is a struct that owns its state and exposes one step
//! method producing a single sample. Step methods never allocate, so the
//! primitives can be embedded directly inside voice structs and driven from
//! the audio callback.

/// Linear ADSR and exponential decay / attack-decay envelopes.
pub mod envelope;
/// State-variable low-pass and biquad filters.
pub mod filter;
/// Seedable xorshift generator.
pub mod noise;
/// Phase-accumulator oscillators.
pub mod oscillator;
/// Pitch glide controllers.
pub mod portamento;
/// Random-tap echo reverb.
pub mod reverb;
/// Power-of-two sample history.
pub mod ring_buffer;

pub use envelope::{Adsr, AttackDecayEnvelope, DecayEnvelope, EnvelopeStage};
pub use filter::{Biquad, BiquadType, SvFilter};
pub use oscillator::{Oscillator, Waveform};
pub use portamento::{Portamento, PortamentoLight};
pub use reverb::RandomReverb;
pub use ring_buffer::RingBuffer;
