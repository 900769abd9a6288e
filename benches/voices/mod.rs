//! Benchmarks for complete voices rendered through `render_block`.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::{
    host::render_block,
    sequencing::PlayOptions,
    voices::{MidiSine, MmlBass, RhythmDrums},
    RenderCtx,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // Ticker, sequencer, glide, square, SVF and ADSR per sample
        let mut bass = MmlBass::new(120.0, SAMPLE_RATE);
        bass.score("L16 O2 C C > C < C E- F G B-", PlayOptions::new().looping(true))
            .ok();
        let mut ctx = RenderCtx::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("mml_bass", size), &size, |b, _| {
            b.iter(|| render_block(&mut bass, &mut ctx, black_box(&mut buffer), 2, &[]))
        });

        // Three synth chains, two biquads and the reverb
        let mut drums = RhythmDrums::new(120.0, SAMPLE_RATE);
        drums
            .score(&["x-x-", "-x-x", "xxxx"], PlayOptions::new().looping(true))
            .ok();
        let mut ctx = RenderCtx::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("rhythm_drums", size), &size, |b, _| {
            b.iter(|| render_block(&mut drums, &mut ctx, black_box(&mut buffer), 2, &[]))
        });

        // Packet parsing every block
        let mut sine = MidiSine::new(SAMPLE_RATE);
        let mut ctx = RenderCtx::new(SAMPLE_RATE);
        let packets = [[0x20, 0x90, 60, 100], [0x20, 0xB0, 1, 64]];
        group.bench_with_input(BenchmarkId::new("midi_sine", size), &size, |b, _| {
            b.iter(|| render_block(&mut sine, &mut ctx, black_box(&mut buffer), 2, &packets))
        });
    }

    group.finish();
}
