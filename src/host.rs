//! The contract between an audio host and the things it renders.
//!
//! The host owns the clock. Once per buffer it builds an [`AudioBlock`] with
//! the interleaved output to fill and the MIDI packets that arrived since
//! the previous call, hands it to a [`Renderer`], then advances its
//! [`RenderCtx`] by the number of frames rendered.

#[cfg(feature = "rtrb")]
use rtrb::Consumer;
use std::collections::VecDeque;

use crate::clock::RenderCtx;

/// One MIDI 1.0 channel voice Universal MIDI Packet.
pub type UmpPacket = [u8; 4];

/// One render request.
pub struct AudioBlock<'a> {
    pub frames: usize,
    pub channels: usize,
    /// Interleaved input, when the host captures audio.
    pub input: Option<&'a [f32]>,
    pub midi: &'a [UmpPacket],
    /// Interleaved output, `frames * channels` samples.
    pub output: &'a mut [f32],
}

impl<'a> AudioBlock<'a> {
    /// Output-only block with no MIDI.
    pub fn new(output: &'a mut [f32], channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            frames: output.len() / channels,
            channels,
            input: None,
            midi: &[],
            output,
        }
    }

    pub fn with_midi(mut self, midi: &'a [UmpPacket]) -> Self {
        self.midi = midi;
        self
    }

    pub fn with_input(mut self, input: &'a [f32]) -> Self {
        self.input = Some(input);
        self
    }

    /// Write the same sample to every channel of `frame`.
    #[inline]
    pub fn set_frame(&mut self, frame: usize, value: f32) {
        let start = frame * self.channels;
        for sample in &mut self.output[start..start + self.channels] {
            *sample = value;
        }
    }

    /// First channel of the input at `frame`, or silence.
    #[inline]
    pub fn input_sample(&self, frame: usize) -> f32 {
        self.input
            .and_then(|input| input.get(frame * self.channels).copied())
            .unwrap_or(0.0)
    }
}

/// Something that fills output buffers, called once per host buffer.
///
/// Implementations must write all `block.frames` frames and must not
/// allocate or block.
pub trait Renderer: Send {
    fn render(&mut self, block: AudioBlock<'_>, ctx: &RenderCtx);
}

/// Render one block and advance the clock, the way a host does.
pub fn render_block<R: Renderer + ?Sized>(
    renderer: &mut R,
    ctx: &mut RenderCtx,
    output: &mut [f32],
    channels: usize,
    midi: &[UmpPacket],
) {
    let block = AudioBlock::new(output, channels).with_midi(midi);
    let frames = block.frames;
    renderer.render(block, ctx);
    ctx.advance(frames);
}

/// Non-blocking source of values produced on another thread.
pub trait MessageReceiver<T> {
    fn pop(&mut self) -> Option<T>;
}

#[cfg(feature = "rtrb")]
impl<T> MessageReceiver<T> for Consumer<T> {
    fn pop(&mut self) -> Option<T> {
        Consumer::pop(self).ok()
    }
}

impl<T> MessageReceiver<T> for VecDeque<T> {
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;

    impl Renderer for Counter {
        fn render(&mut self, mut block: AudioBlock<'_>, ctx: &RenderCtx) {
            for frame in 0..block.frames {
                block.set_frame(frame, (ctx.frame + frame as u64) as f32);
            }
        }
    }

    #[test]
    fn test_render_block_advances_clock() {
        let mut ctx = RenderCtx::new(48_000.0);
        let mut out = vec![0.0f32; 8];
        render_block(&mut Counter, &mut ctx, &mut out, 2, &[]);
        assert_eq!(out, vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(ctx.frame, 4);

        render_block(&mut Counter, &mut ctx, &mut out, 2, &[]);
        assert_eq!(out[0], 4.0);
        assert_eq!(ctx.frame, 8);
    }

    #[test]
    fn test_input_sample_defaults_to_silence() {
        let mut out = [0.0f32; 4];
        let block = AudioBlock::new(&mut out, 2);
        assert_eq!(block.input_sample(0), 0.0);

        let input = [0.5, -0.5, 0.25, -0.25];
        let mut out = [0.0f32; 4];
        let block = AudioBlock::new(&mut out, 2).with_input(&input);
        assert_eq!(block.input_sample(1), 0.25);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_rtrb_consumer_receives() {
        let (mut producer, mut consumer) = rtrb::RingBuffer::<u32>::new(4);
        producer.push(7).unwrap();
        assert_eq!(MessageReceiver::pop(&mut consumer), Some(7));
        assert_eq!(MessageReceiver::pop(&mut consumer), None);
    }
}
