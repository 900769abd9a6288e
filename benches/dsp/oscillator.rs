//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::{dsp::oscillator::Oscillator, RenderCtx};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::new(48_000.0);

    let shapes = [
        // sin() per sample
        ("sine", Oscillator::sine()),
        ("square", Oscillator::square()),
        ("pulse", Oscillator::pulse(0.25)),
        ("triangle", Oscillator::triangle()),
        // branch on morph plus two divisions
        ("tri_saw", Oscillator::tri_saw(0.3)),
        ("saw", Oscillator::saw()),
        // xorshift, no phase update
        ("noise", Oscillator::noise()),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, osc) in &shapes {
            let mut osc = osc.clone();
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(440.0), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
