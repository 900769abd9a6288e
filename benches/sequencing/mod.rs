//! Benchmarks for score compilation and per-frame playback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oto_dsp::sequencing::{CompileConfig, Mml, PlayOptions, Rhythm, RhythmConfig, Ticker};

use crate::BLOCK_SIZES;

const SCORE: &str =
    "Q3 L8 O3 |CDEFGABR|>C<BAGFED4| q.70 N48n50f-e# a--g++b8.r16 | o4C!~O3 B16+8^8-8.~ l16A~A~L8 GF!ED8..R32 ";

const PATTERNS: [&str; 3] = ["X---x---X---x-x-", "----X-------X--x", "x-x-X-x-x-x-X-xx"];

pub fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencing/compile");

    let config = CompileConfig::default();
    group.bench_function("mml", |b| b.iter(|| config.compile(black_box(SCORE))));

    // Compilation runs off the audio thread, but long scores should still be cheap.
    let long = SCORE.repeat(16);
    group.bench_function("mml_x16", |b| b.iter(|| config.compile(black_box(&long))));

    let rhythm = RhythmConfig::default();
    group.bench_function("rhythm", |b| b.iter(|| rhythm.compile(black_box(&PATTERNS))));

    group.finish();
}

pub fn bench_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencing/playback");

    for &size in BLOCK_SIZES {
        let mut ticker = Ticker::new(480.0, 0.0, 48_000.0);
        let mut mml = Mml::default();
        mml.score(SCORE, PlayOptions::new().looping(true)).ok();
        group.bench_with_input(BenchmarkId::new("mml", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    mml.play(ticker.next_tick());
                }
                black_box(mml.frequency())
            })
        });

        let mut ticker = Ticker::new(480.0, 0.0, 48_000.0);
        let mut rhythm = Rhythm::new();
        rhythm.score(&PATTERNS, PlayOptions::new().looping(true)).ok();
        group.bench_with_input(BenchmarkId::new("rhythm", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    rhythm.play(ticker.next_tick());
                }
                black_box(rhythm.trigger(0))
            })
        });
    }

    group.finish();
}
