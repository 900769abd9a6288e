// Purpose - MIDI input decoding and the control signals derived from it

pub mod control;
pub mod converter;
pub mod midi;
pub mod mono;

pub use control::ControlParser;
pub use converter::midi_note_to_freq;
pub use midi::MidiEvent;
pub use mono::MonoParser;
