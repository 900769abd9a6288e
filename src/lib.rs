pub mod clock; // Host-supplied sample clock
pub mod dsp;
pub mod host; // Render contract between host and scripts
pub mod io;
pub mod sequencing; // MML / rhythm compilers and tick playback
pub mod voices; // Ready-made primitive compositions

pub use clock::RenderCtx;

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Sequencer resolution: ticks per quarter note.
pub const TICKS_PER_QUARTER: f64 = 960.0;

/// Shortest envelope stage, in seconds. Keeps stage slopes finite.
pub(crate) const MIN_STAGE_TIME: f32 = 0.0005;
