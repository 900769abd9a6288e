//! Monophonic note tracking from MIDI input.
//!
//! Held keys are kept on a stack, most recent last. The sounding note is
//! always the top of the stack, so releasing the newest key falls back to
//! the one held before it (last-note priority). Velocity is latched only
//! when a phrase starts from silence; notes played legato over a held key
//! keep the phrase's velocity.

use tracing::trace;

use super::converter::{midi_note_to_freq, normalize_7bit, semitones_to_ratio};
use super::midi::MidiEvent;

/// Maximum number of held keys tracked; the oldest is dropped beyond this.
pub const NOTE_STACK_SIZE: usize = 128;

/// Modulation wheel controller number.
const CC_MODULATION: u8 = 1;

pub struct MonoParser {
    group: Option<u8>,
    channel: Option<u8>,
    bend_range: f32,
    tune_a4: f32,

    stack: Vec<u8>,
    base_frequency: f32,
    velocity: f32,
    pitchbend: f32,
    modulation: f32,
}

impl MonoParser {
    pub fn new() -> Self {
        Self {
            group: None,
            channel: None,
            bend_range: 2.0,
            tune_a4: 440.0,

            stack: Vec::with_capacity(NOTE_STACK_SIZE),
            base_frequency: 440.0,
            velocity: 0.0,
            pitchbend: 0.0,
            modulation: 0.0,
        }
    }

    /// Only accept messages from this UMP group.
    pub fn with_group(mut self, group: u8) -> Self {
        self.group = Some(group & 0x0F);
        self
    }

    /// Only accept messages on this channel.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel & 0x0F);
        self
    }

    /// Pitch bend range in semitones at full deflection.
    pub fn with_bend_range(mut self, semitones: f32) -> Self {
        self.bend_range = semitones;
        self
    }

    pub fn with_tune_a4(mut self, tune_a4: f32) -> Self {
        self.tune_a4 = tune_a4;
        self.base_frequency = tune_a4;
        self
    }

    /// Feed every packet delivered with one render call.
    pub fn parse<P: AsRef<[u8]>>(&mut self, packets: &[P]) {
        for packet in packets {
            let bytes = packet.as_ref();
            match MidiEvent::from_ump(bytes) {
                Some(event) => self.handle(event),
                None => trace!(?bytes, "ignoring MIDI packet"),
            }
        }
    }

    pub fn handle(&mut self, event: MidiEvent) {
        if !self.accepts(&event) {
            trace!(?event, "MIDI event filtered out");
            return;
        }

        match event {
            MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => self.note_on(key, velocity),
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => self.note_off(key),
            MidiEvent::PitchBend { value, .. } => self.pitchbend = value as f32 / 8192.0,
            MidiEvent::ControlChange {
                controller: CC_MODULATION,
                value,
                ..
            } => self.modulation = normalize_7bit(value),
            _ => {}
        }
    }

    fn accepts(&self, event: &MidiEvent) -> bool {
        self.group.map_or(true, |g| g == event.group())
            && self.channel.map_or(true, |c| c == event.channel())
    }

    fn note_on(&mut self, key: u8, velocity: u8) {
        if self.stack.is_empty() {
            self.velocity = normalize_7bit(velocity);
        }
        if self.stack.len() == NOTE_STACK_SIZE {
            self.stack.remove(0);
        }
        self.stack.push(key);
        self.base_frequency = midi_note_to_freq(key, self.tune_a4);
    }

    fn note_off(&mut self, key: u8) {
        self.stack.retain(|&held| held != key);
        match self.stack.last() {
            Some(&top) => self.base_frequency = midi_note_to_freq(top, self.tune_a4),
            None => self.velocity = 0.0,
        }
    }

    /// The sounding key, if any is held.
    pub fn note(&self) -> Option<u8> {
        self.stack.last().copied()
    }

    /// A key is held.
    pub fn gate(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Bent frequency of the sounding (or last sounded) note.
    pub fn frequency(&self) -> f32 {
        self.base_frequency * semitones_to_ratio(self.bend_range * self.pitchbend)
    }

    /// 0.0 ..= 1.0, zero when no key is held.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// -1.0 ..< 1.0
    pub fn pitchbend(&self) -> f32 {
        self.pitchbend
    }

    /// 0.0 ..= 1.0
    pub fn modulation(&self) -> f32 {
        self.modulation
    }

    pub fn held(&self) -> &[u8] {
        &self.stack
    }
}

impl Default for MonoParser {
    fn default() -> Self {
        Self::new()
    }
}
