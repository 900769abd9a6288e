/// Equal-tempered frequency of a MIDI note, with A4 (note 69) at `tune_a4` Hz.
pub fn midi_note_to_freq(note: u8, tune_a4: f32) -> f32 {
    tune_a4 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Frequency ratio of a bend of `semitones`.
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    2.0_f32.powf(semitones / 12.0)
}

/// 7-bit MIDI value scaled to 0.0 ..= 1.0.
pub fn normalize_7bit(value: u8) -> f32 {
    value as f32 / 127.0
}
