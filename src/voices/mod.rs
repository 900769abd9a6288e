//! Ready-made voices built from the primitives and sequencers.
//!
//! Each voice implements [`Renderer`](crate::host::Renderer), so it can be
//! handed straight to a host. Use them as starting points for your own
//! patches, or study them to see how the pieces fit together.
//!
//! # Example
//!
//! ```ignore
//! use oto_dsp::{sequencing::PlayOptions, voices::MmlBass};
//!
//! let mut bass = MmlBass::new(120.0, 48_000.0);
//! bass.score("L8 O2 C C > C < C", PlayOptions::new().looping(true))?;
//! ```

mod bass;
mod drums;
mod midi_sine;

pub use bass::MmlBass;
pub use drums::{RhythmDrums, HAT, KICK, SNARE};
pub use midi_sine::MidiSine;
