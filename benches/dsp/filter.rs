//! Benchmarks for the state-variable and biquad filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::{
    dsp::{
        filter::{Biquad, SvFilter},
        oscillator::Oscillator,
    },
    RenderCtx,
};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut input = vec![0.0f32; size];
        Oscillator::saw().render(&mut input, 110.0, &ctx);
        let mut buffer = vec![0.0f32; size];

        // Coefficients recomputed every sample
        let mut svf = SvFilter::new();
        group.bench_with_input(BenchmarkId::new("svf", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = svf.next_sample(black_box(x), 1_200.0, 0.3, &ctx);
                }
            })
        });

        // Cached coefficients, fixed cutoff
        let mut biquad = Biquad::lowpass();
        group.bench_with_input(BenchmarkId::new("biquad_fixed", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                biquad.render(black_box(&mut buffer), 1_200.0, 0.707, &ctx);
            })
        });

        // Cutoff moving every sample, forcing a recompute
        let mut biquad = Biquad::lowpass();
        group.bench_with_input(BenchmarkId::new("biquad_sweep", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &x)) in buffer.iter_mut().zip(&input).enumerate() {
                    let cutoff = 200.0 + i as f32 * 10.0;
                    *out = biquad.next_sample(black_box(x), cutoff, 0.707, &ctx);
                }
            })
        });
    }

    group.finish();
}
