//! Benchmarks for the random-tap reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::dsp::reverb::RandomReverb;

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Cost scales with tap count
        for density in [8, 32, 128] {
            let mut reverb = RandomReverb::new(0.01, 0.5, density, 0.4, 48_000.0);
            let id = BenchmarkId::new(format!("taps_{density}"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| {
                    buffer[0] = 1.0;
                    reverb.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
