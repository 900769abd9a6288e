//! Score compilers and tick-driven sequencers.
//!
//! Text goes in once (MML or rhythm patterns), a tick-ordered event list
//! comes out, and a sequencer replays it against the ticks produced by a
//! [`Ticker`] one frame at a time.

pub mod error;
pub mod length;
pub mod mml;
pub mod playback;
pub mod rhythm;
pub mod ticker;

pub use error::CompileError;
pub use length::parse_length;
pub use mml::{CompileConfig, Event, Mml, Score};
pub use playback::{PlayOptions, Playback, Timed};
pub use rhythm::{Rhythm, RhythmConfig, RhythmEvent, RhythmScore};
pub use ticker::Ticker;
