/// Clock context handed to primitives and renderers.
///
/// The host owns both values:
/// - sample_rate: Audio sample rate (e.g., 48000.0), fixed for the process
/// - frame: Number of frames rendered so far
///
/// Nothing in the library advances the clock on its own; the host calls
/// [`RenderCtx::advance`] after each render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
        }
    }

    /// Seconds per frame.
    #[inline]
    pub fn dtime(&self) -> f32 {
        1.0 / self.sample_rate
    }

    /// Elapsed time in seconds at the current frame.
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Move the frame counter forward after a block has been rendered.
    pub fn advance(&mut self, frames: usize) {
        self.frame += frames as u64;
    }
}
