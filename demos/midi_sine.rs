//! MIDI-driven sine lead without a MIDI device
//!
//! Feeds hand-built UMP packets to the voice block by block: a legato
//! phrase, a pitch bend, some mod wheel overdrive, then releases.
//!
//! Run with: cargo run --example midi_sine

use oto_dsp::{
    host::{render_block, UmpPacket},
    io::MidiEvent,
    voices::MidiSine,
    RenderCtx,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 512;

fn note_on(note: u8, velocity: u8) -> UmpPacket {
    MidiEvent::NoteOn { group: 0, channel: 0, key: note, velocity }.to_ump()
}

fn note_off(note: u8) -> UmpPacket {
    MidiEvent::NoteOff { group: 0, channel: 0, key: note, velocity: 0 }.to_ump()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // (block index, packets delivered at the start of that block)
    let script: Vec<(usize, Vec<UmpPacket>)> = vec![
        (0, vec![note_on(57, 100)]),
        (20, vec![note_on(60, 80)]),
        (40, vec![note_on(64, 120)]),
        (60, vec![MidiEvent::PitchBend { group: 0, channel: 0, value: 4096 }.to_ump()]),
        (80, vec![MidiEvent::ControlChange { group: 0, channel: 0, controller: 1, value: 127 }.to_ump()]),
        (100, vec![note_off(64)]),
        (120, vec![note_off(60)]),
        (140, vec![note_off(57)]),
    ];

    let mut voice = MidiSine::new(SAMPLE_RATE);
    let mut ctx = RenderCtx::new(SAMPLE_RATE);
    let mut block = vec![0.0f32; BLOCK];

    for index in 0..180 {
        let midi = script
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, packets)| packets.as_slice())
            .unwrap_or(&[]);

        render_block(&mut voice, &mut ctx, &mut block, 1, midi);

        if index % 20 == 0 {
            let peak = block.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
            let parser = voice.parser();
            println!(
                "{:>5.2} s  note {:<8} {:>8.2} Hz  peak {peak:.3}",
                ctx.time(),
                parser.note().map_or("-".to_string(), |n| n.to_string()),
                parser.frequency(),
            );
        }
    }
    Ok(())
}
