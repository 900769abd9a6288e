use crate::TICKS_PER_QUARTER;

/// Converts elapsed frames into musical ticks at a fixed tempo.
///
/// Call [`next_tick`](Self::next_tick) exactly once per frame. The first call
/// returns `offset + dticks`, so a sequencer fed from a fresh ticker sees
/// events at tick 0 on the very first frame.
#[derive(Debug, Clone)]
pub struct Ticker {
    current: f64,
    dticks: f64,
    sample_rate: f64,
}

impl Ticker {
    /// * `bpm` - quarter notes per minute
    /// * `offset` - starting position in ticks
    pub fn new(bpm: f64, offset: f64, sample_rate: f32) -> Self {
        let sample_rate = sample_rate as f64;
        Self {
            current: offset,
            dticks: ticks_per_frame(bpm, sample_rate),
            sample_rate,
        }
    }

    #[inline]
    pub fn next_tick(&mut self) -> f64 {
        self.current += self.dticks;
        self.current
    }

    /// Change tempo from the next frame on, keeping the current position.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.dticks = ticks_per_frame(bpm, self.sample_rate);
    }

    pub fn bpm(&self) -> f64 {
        self.dticks * 60.0 * self.sample_rate / TICKS_PER_QUARTER
    }

    /// Ticks advanced per frame.
    pub fn dticks(&self) -> f64 {
        self.dticks
    }

    /// Last returned position.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Position `frames` frames after a tick of zero.
    pub fn ticks_at(&self, frames: u64) -> f64 {
        frames as f64 * self.dticks
    }
}

fn ticks_per_frame(bpm: f64, sample_rate: f64) -> f64 {
    TICKS_PER_QUARTER * bpm / 60.0 / sample_rate
}
