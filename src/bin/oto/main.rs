//! oto - plays an MML bass line and swaps scores live
//!
//! Run with: cargo run -- [score.mml]
//!
//! Each line typed on stdin is compiled as a new score and replaces the one
//! playing at the next audio callback. Tempo comes from `OTO_BPM` (default
//! 120), log level from `RUST_LOG` (default `info`).

mod audio;

use std::io::BufRead;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oto_dsp::{
    sequencing::{CompileConfig, PlayOptions},
    voices::MmlBass,
};

const DEFAULT_BPM: f64 = 120.0;

const DEFAULT_SCORE: &str =
    "Q3 L8 O3 |CDEFGABR|>C<BAGFED4| q.70 N48n50f-e# a--g++b8.r16 | o4C!~O3 B16+8^8-8.~ l16A~A~L8 GF!ED8..R32 ";

/// Scores waiting for the audio thread. Extra scores beyond this are dropped.
const SCORE_QUEUE_SIZE: usize = 4;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bpm = match std::env::var("OTO_BPM") {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .wrap_err_with(|| format!("OTO_BPM is not a number: {value:?}"))?,
        Err(_) => DEFAULT_BPM,
    };

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).wrap_err_with(|| format!("failed to read score {path}"))?,
        None => DEFAULT_SCORE.to_string(),
    };

    let compiler = CompileConfig::default();
    let score = compiler.compile(&text).wrap_err("failed to compile score")?;

    let (device, config) = audio::open_output()?;
    let output = audio::output_info(&config);

    let mut bass = MmlBass::new(bpm, output.sample_rate);
    bass.mml_mut().set_score(score, PlayOptions::new().looping(true));

    let (mut producer, consumer) = rtrb::RingBuffer::new(SCORE_QUEUE_SIZE);
    let _stream = audio::start(&device, config, bass, consumer)?;

    info!(bpm, "playing; type MML to replace the score, Ctrl+C to quit");

    for line in std::io::stdin().lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match compiler.compile(&line) {
            Ok(score) => {
                let events = score.events.len();
                if producer.push(score).is_err() {
                    warn!("score queue full, dropping score");
                } else {
                    info!(events, "queued new score");
                }
            }
            Err(err) => warn!("{err}"),
        }
    }

    // stdin closed: keep playing the last score.
    loop {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
}
