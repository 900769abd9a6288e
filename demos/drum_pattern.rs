//! Rhythm sequencer driving the three-piece drum voice
//!
//! Run with: cargo run --example drum_pattern

use oto_dsp::{
    host::render_block,
    sequencing::PlayOptions,
    voices::{RhythmDrums, HAT, KICK, SNARE},
    RenderCtx, MAX_BLOCK_SIZE,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let patterns = [
        "X---x---X---x-x-", // kick
        "----X-------X--x", // snare
        "x-x-X-x-x-x-X-xx", // hat
    ];

    let mut drums = RhythmDrums::new(128.0, SAMPLE_RATE);
    drums.score(&patterns, PlayOptions::new().looping(true))?;

    let rhythm = drums.rhythm();
    println!(
        "{} tracks, loop of {} ticks",
        rhythm.tracks(),
        rhythm.loop_length()
    );
    for (track, name) in [(KICK, "kick"), (SNARE, "snare"), (HAT, "hat")] {
        let hits = rhythm.events().iter().filter(|e| e.trigger[track]).count();
        let accents = rhythm.events().iter().filter(|e| e.accent[track]).count();
        println!("  {name:<6} {hits} hits, {accents} accented");
    }

    let mut ctx = RenderCtx::new(SAMPLE_RATE);
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut peak = 0.0f32;
    for _ in 0..(8.0 * SAMPLE_RATE) as usize / MAX_BLOCK_SIZE {
        render_block(&mut drums, &mut ctx, &mut block, 1, &[]);
        peak = block.iter().fold(peak, |acc, &x| acc.max(x.abs()));
    }
    println!("rendered {:.1} s: peak {peak:.3}", ctx.time());
    Ok(())
}
