//! Offline render of the MML bass voice
//!
//! Compiles a score using most of the MML vocabulary (octave shifts,
//! gate, ties, slurs, raw MIDI notes) and renders a few loops of it
//! without an audio device, printing what the sequencer did.
//!
//! Run with: cargo run --example mml_bass

use oto_dsp::{host::render_block, sequencing::PlayOptions, voices::MmlBass, RenderCtx, MAX_BLOCK_SIZE};

const SCORE: &str =
    "Q3 L8 O3 |CDEFGABR|>C<BAGFED4| q.70 N48n50f-e# a--g++b8.r16 | o4C!~O3 B16+8^8-8.~ l16A~A~L8 GF!ED8..R32 ";

const SAMPLE_RATE: f32 = 48_000.0;
const SECONDS: f32 = 12.0;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut bass = MmlBass::new(120.0, SAMPLE_RATE);
    bass.score(SCORE, PlayOptions::new().looping(true))?;

    let mml = bass.mml();
    println!(
        "{} events, {} ticks per loop ({:.2} s at 120 bpm)",
        mml.events().len(),
        mml.total_ticks(),
        mml.total_ticks() / 960.0 * 0.5
    );
    for event in mml.events().iter().take(8) {
        println!(
            "  tick {:>7.1}  {:>8.2} Hz  {}{}",
            event.tick,
            event.frequency,
            if event.trigger { "on " } else { "off" },
            if event.accent { " accent" } else { "" }
        );
    }

    let mut ctx = RenderCtx::new(SAMPLE_RATE);
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];
    let blocks = (SECONDS * SAMPLE_RATE) as usize / MAX_BLOCK_SIZE;

    let mut peak = 0.0f32;
    let mut sum_squares = 0.0f64;
    for _ in 0..blocks {
        render_block(&mut bass, &mut ctx, &mut block, 1, &[]);
        for &sample in &block {
            peak = peak.max(sample.abs());
            sum_squares += f64::from(sample * sample);
        }
    }

    let rms = (sum_squares / (blocks * MAX_BLOCK_SIZE) as f64).sqrt();
    println!("rendered {:.1} s: peak {peak:.3}, rms {rms:.3}", ctx.time());
    Ok(())
}
