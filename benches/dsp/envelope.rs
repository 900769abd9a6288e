//! Benchmarks for the ADSR and exponential envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::{
    dsp::envelope::{Adsr, DecayEnvelope},
    RenderCtx,
};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Adsr::new(10.0, 0.1, 0.7, 0.3);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), true, black_box(&ctx));
            })
        });

        // Sustain phase (holding steady)
        let mut env = Adsr::new(0.001, 0.001, 0.7, 0.3);
        for _ in 0..200 {
            env.next_sample(true, &ctx);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), true, black_box(&ctx));
            })
        });

        // One multiply per sample
        let mut env = DecayEnvelope::new(0.5, 48_000.0);
        env.next_sample(true);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = env.next_sample(black_box(true));
                }
            })
        });
    }

    group.finish();
}
