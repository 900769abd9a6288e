/*
Music Macro Language
====================

A score is a string of single-letter commands, each optionally followed by
pitch modifiers, a length and post-modifiers. Case does not matter.

    O4 C D E F | G4. A8 B4 > C2~ C2 | < L8 C E G > C!

Commands
--------

    C D E F G A B   note in the current octave
    N<n>            note by MIDI number, default length
    R               rest
    O<n>            set octave (C4 = middle C = note 60)
    > <             octave up / down
    L<len>          set default length
    Q<g>            gate: g >= 1 means g/8 of each note, otherwise the
                    ratio itself. `Q<g>!` makes it absolute: that share of
                    the default length, regardless of the note's length.

Modifiers and lengths
---------------------

    # +   sharp           C#4   C+4
    -     flat            B-8
    len   see `length`    4  8.  4+8  2^8  2-16
    !     accent          C4!
    ~     legato tie      C4~ D4     (no note-off, next note glides in)

`|`, spaces, tabs and newlines separate tokens and are otherwise ignored.

Tokenizer
---------

Four states. A character is either consumed by the current state
(Advance) or handed to another state unchanged (Reenter):

    Label ──label──→ Modifier ──len──→ Length ──!~──→ PostModifier
      ↑                 │ └──────────!~──────────────→ ↑
      └──── label (Reenter) / delimiter (Advance) ─────┘
                        finishes the pending token

Each character can be re-dispatched at most once per state, so the loop
always terminates.

Events
------

A note emits a trigger-on at the cursor and, unless tied, a trigger-off
`gate` ticks later, then moves the cursor by its length. The final list is
stably sorted by tick, so gate-offs that overshoot later notes still come
out in order.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CompileError;
use super::length::{parse_float_prefix, parse_int_prefix, parse_length};
use super::playback::{PlayOptions, Playback, Timed};
use crate::host::MessageReceiver;
use crate::TICKS_PER_QUARTER;

const LABELS: &str = "CDEFGABNRO><LQ";
const MODIFIERS: &str = "#+-";
const LENGTH_CHARS: &str = "0123456789.+-^";
const POST_MODIFIERS: &str = "!~";
const DELIMITERS: &str = "| \n\r\t";

/// One change of the sequencer status.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Position in ticks from the start of the score.
    pub tick: f64,
    /// Pitch in Hz.
    pub frequency: f32,
    /// Note on (true) or off (false).
    pub trigger: bool,
    pub accent: bool,
}

impl Timed for Event {
    fn tick(&self) -> f64 {
        self.tick
    }
}

/// A compiled MML score.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    /// Ascending by tick.
    pub events: Vec<Event>,
    /// Cursor position after the last command.
    pub total_ticks: f64,
}

impl Score {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Initial musical state for one compile pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompileConfig {
    /// Frequency of A4 in Hz.
    pub tune_a4: f64,
    pub octave: i64,
    /// Length of notes written without one, in ticks.
    pub default_length: f64,
    /// Gate ratio, or gate ticks when `gate_absolute` is set.
    pub gate: f64,
    pub gate_absolute: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            tune_a4: 440.0,
            octave: 4,
            default_length: TICKS_PER_QUARTER,
            gate: 7.0 / 8.0,
            gate_absolute: false,
        }
    }
}

impl CompileConfig {
    pub fn with_tune_a4(mut self, tune_a4: f64) -> Self {
        self.tune_a4 = tune_a4;
        self
    }

    pub fn with_octave(mut self, octave: i64) -> Self {
        self.octave = octave;
        self
    }

    pub fn with_default_length(mut self, ticks: f64) -> Self {
        self.default_length = ticks;
        self
    }

    /// Gate as a share of each note's length.
    pub fn with_gate(mut self, ratio: f64) -> Self {
        self.gate = ratio;
        self.gate_absolute = false;
        self
    }

    /// Gate as a fixed number of ticks.
    pub fn with_absolute_gate(mut self, ticks: f64) -> Self {
        self.gate = ticks;
        self.gate_absolute = true;
        self
    }

    /// Compile an MML string into a score.
    pub fn compile(&self, mml: &str) -> Result<Score, CompileError> {
        let mut compiler = Compiler::new(self);
        let mut state = State::Label;

        for (position, raw) in mml.chars().enumerate() {
            let c = raw.to_ascii_uppercase();
            loop {
                match compiler.feed(state, c) {
                    Some(Transition::Advance(next)) => {
                        state = next;
                        break;
                    }
                    Some(Transition::Reenter(next)) => state = next,
                    None => {
                        return Err(CompileError::UnexpectedCharacter {
                            character: raw,
                            position,
                            input: mml.to_string(),
                        });
                    }
                }
            }
        }
        compiler.finish();

        let Compiler {
            mut events, cursor, ..
        } = compiler;
        events.sort_by(|a, b| a.tick.total_cmp(&b.tick));

        debug!(events = events.len(), total_ticks = cursor, "compiled MML score");
        Ok(Score {
            events,
            total_ticks: cursor,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Label,
    Modifier,
    Length,
    PostModifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Character consumed; the next one starts in this state.
    Advance(State),
    /// Character not consumed; dispatch it again in this state.
    Reenter(State),
}

#[derive(Debug)]
struct Token {
    label: char,
    /// Semitones from `#`, `+` and `-`.
    modifier: i64,
    length: String,
    accent: bool,
    legato: bool,
}

impl Token {
    fn new(label: char) -> Self {
        Self {
            label,
            modifier: 0,
            length: String::new(),
            accent: false,
            legato: false,
        }
    }
}

struct Compiler {
    tune_a4: f64,
    octave: i64,
    default_length: f64,
    gate: f64,
    gate_absolute: bool,

    token: Option<Token>,
    cursor: f64,
    events: Vec<Event>,
}

impl Compiler {
    fn new(config: &CompileConfig) -> Self {
        Self {
            tune_a4: config.tune_a4,
            octave: config.octave,
            default_length: config.default_length,
            gate: config.gate,
            gate_absolute: config.gate_absolute,

            token: None,
            cursor: 0.0,
            events: Vec::new(),
        }
    }

    /// Dispatch one (uppercased) character in `state`. `None` when no
    /// state can take it.
    fn feed(&mut self, state: State, c: char) -> Option<Transition> {
        use State::*;
        use Transition::*;

        let is_label = LABELS.contains(c);
        let is_delimiter = DELIMITERS.contains(c);

        match state {
            Label => {
                if is_label {
                    self.token = Some(Token::new(c));
                    Some(Advance(Modifier))
                } else if is_delimiter {
                    Some(Advance(Label))
                } else {
                    None
                }
            }
            Modifier => {
                if MODIFIERS.contains(c) {
                    if let Some(token) = self.token.as_mut() {
                        token.modifier += if c == '-' { -1 } else { 1 };
                    }
                    Some(Advance(Modifier))
                } else if is_label {
                    self.finish();
                    Some(Reenter(Label))
                } else if LENGTH_CHARS.contains(c) {
                    Some(Reenter(Length))
                } else if POST_MODIFIERS.contains(c) {
                    Some(Reenter(PostModifier))
                } else if is_delimiter {
                    self.finish();
                    Some(Advance(Label))
                } else {
                    None
                }
            }
            Length => {
                if LENGTH_CHARS.contains(c) {
                    if let Some(token) = self.token.as_mut() {
                        token.length.push(c);
                    }
                    Some(Advance(Length))
                } else if is_label {
                    self.finish();
                    Some(Reenter(Label))
                } else if POST_MODIFIERS.contains(c) {
                    Some(Reenter(PostModifier))
                } else if is_delimiter {
                    self.finish();
                    Some(Advance(Label))
                } else {
                    None
                }
            }
            PostModifier => {
                if POST_MODIFIERS.contains(c) {
                    if let Some(token) = self.token.as_mut() {
                        match c {
                            '!' => token.accent = true,
                            _ => token.legato = true,
                        }
                    }
                    Some(Advance(PostModifier))
                } else if is_label {
                    self.finish();
                    Some(Reenter(Label))
                } else if is_delimiter {
                    self.finish();
                    Some(Advance(Label))
                } else {
                    None
                }
            }
        }
    }

    /// Run the pending token's command, if any.
    fn finish(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };

        match token.label {
            'C' | 'D' | 'E' | 'F' | 'G' | 'A' | 'B' => {
                let note = pitch_class(token.label) + (self.octave + 1) * 12 + token.modifier;
                let length = self.length_or_default(&token.length);
                self.note(note, length, &token);
            }
            'N' => match parse_int_prefix(&token.length) {
                Some(note) => {
                    let length = self.default_length;
                    self.note(note, length, &token);
                }
                None => self.cursor += self.default_length,
            },
            'R' => self.cursor += self.length_or_default(&token.length),
            'O' => {
                if let Some(octave) = parse_int_prefix(&token.length) {
                    self.octave = octave;
                }
            }
            '>' => self.octave += 1,
            '<' => self.octave -= 1,
            'L' => {
                if !token.length.is_empty() {
                    self.default_length = parse_length(&token.length);
                }
            }
            'Q' => {
                if let Some(g) = parse_float_prefix(&token.length) {
                    let ratio = if g >= 1.0 { g / 8.0 } else { g };
                    if token.accent {
                        self.gate_absolute = true;
                        self.gate = self.default_length * ratio;
                    } else {
                        self.gate_absolute = false;
                        self.gate = ratio;
                    }
                }
            }
            _ => {}
        }
    }

    fn length_or_default(&self, length: &str) -> f64 {
        if length.is_empty() {
            self.default_length
        } else {
            parse_length(length)
        }
    }

    fn note(&mut self, note: i64, length: f64, token: &Token) {
        let frequency = (self.tune_a4 * ((note - 69) as f64 / 12.0).exp2()) as f32;
        let gate = if self.gate_absolute {
            self.gate
        } else {
            (length * self.gate).floor()
        };

        self.events.push(Event {
            tick: self.cursor,
            frequency,
            trigger: true,
            accent: token.accent,
        });
        if !token.legato {
            self.events.push(Event {
                tick: self.cursor + gate,
                frequency,
                trigger: false,
                accent: token.accent,
            });
        }
        self.cursor += length;
    }
}

fn pitch_class(label: char) -> i64 {
    match label {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => 0,
    }
}

/// Melodic sequencer: replays a compiled score against the host's ticks.
///
/// ```ignore
/// let mut mml = Mml::default();
/// mml.score("L8 C D E F G", PlayOptions::new().looping(true))?;
/// let tick = ticker.next_tick();
/// mml.play(tick);
/// let hz = mml.frequency();
/// ```
pub struct Mml {
    config: CompileConfig,
    score: Score,
    playback: Playback,

    frequency: f32,
    trigger: bool,
    accent: bool,
}

impl Mml {
    pub fn new(tune_a4: f64) -> Self {
        Self::with_config(CompileConfig::default().with_tune_a4(tune_a4))
    }

    /// Scores passed to [`score`](Self::score) are compiled with `config`.
    pub fn with_config(config: CompileConfig) -> Self {
        Self {
            config,
            score: Score::default(),
            playback: Playback::new(),
            frequency: 0.0,
            trigger: false,
            accent: false,
        }
    }

    /// Compile `mml` and install it. On error the current score stays.
    pub fn score(&mut self, mml: &str, options: PlayOptions) -> Result<(), CompileError> {
        let score = self.config.compile(mml)?;
        self.set_score(score, options);
        Ok(())
    }

    /// Install a precompiled score, returning the one it replaces.
    pub fn set_score(&mut self, score: Score, options: PlayOptions) -> Score {
        self.playback.configure(&options, score.total_ticks);
        debug!(
            events = score.events.len(),
            loop_length = self.playback.loop_length(),
            looping = self.playback.is_looping(),
            "installed MML score"
        );
        std::mem::replace(&mut self.score, score)
    }

    /// Install the newest score waiting in `receiver`, if any.
    ///
    /// Scores are compiled elsewhere; the replaced score is dropped here.
    pub fn poll_scores<R: MessageReceiver<Score>>(&mut self, receiver: &mut R) -> bool {
        let mut latest = None;
        while let Some(score) = receiver.pop() {
            latest = Some(score);
        }
        match latest {
            Some(score) => {
                self.set_score(score, PlayOptions::default());
                true
            }
            None => false,
        }
    }

    /// Advance to `tick`. Call once per frame.
    #[inline]
    pub fn play(&mut self, tick: f64) {
        if let Some(event) = self.playback.play(tick, &self.score.events) {
            self.frequency = event.frequency;
            self.trigger = event.trigger;
            self.accent = event.accent;
        }
    }

    /// Rewind to the start of the score and clear the status.
    pub fn reset(&mut self) {
        self.playback.rewind();
        self.trigger = false;
        self.accent = false;
    }

    /// Current pitch in Hz; keeps the last note's pitch after its note-off.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn trigger(&self) -> bool {
        self.trigger
    }

    pub fn accent(&self) -> bool {
        self.accent
    }

    pub fn events(&self) -> &[Event] {
        &self.score.events
    }

    pub fn total_ticks(&self) -> f64 {
        self.score.total_ticks
    }

    pub fn loop_length(&self) -> f64 {
        self.playback.loop_length()
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }
}

impl Default for Mml {
    fn default() -> Self {
        Self::with_config(CompileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn compile(mml: &str) -> Score {
        CompileConfig::default().compile(mml).unwrap()
    }

    fn note_hz(note: i32) -> f32 {
        (440.0 * ((note - 69) as f64 / 12.0).exp2()) as f32
    }

    fn ticks(score: &Score) -> Vec<(f64, bool)> {
        score.events.iter().map(|e| (e.tick, e.trigger)).collect()
    }

    #[test]
    fn test_single_note() {
        let score = compile("C4");
        assert_eq!(score.events.len(), 2);
        assert_eq!(ticks(&score), vec![(0.0, true), (840.0, false)]);
        assert!((score.events[0].frequency - 261.63).abs() < 0.01);
        assert_eq!(score.total_ticks, 960.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(compile("c4 d8"), compile("C4 D8"));
    }

    #[test]
    fn test_scale_with_octave_commands() {
        let score = compile("O3 A > A < < A");
        let on: Vec<f32> = score.events.iter().filter(|e| e.trigger).map(|e| e.frequency).collect();
        assert_eq!(on, vec![note_hz(57), note_hz(69), note_hz(45)]);
    }

    #[test]
    fn test_modifiers() {
        let score = compile("C#D-E+F##");
        let on: Vec<f32> = score.events.iter().filter(|e| e.trigger).map(|e| e.frequency).collect();
        assert_eq!(on, vec![note_hz(61), note_hz(61), note_hz(65), note_hz(67)]);
    }

    #[test]
    fn test_default_length_and_dots() {
        let score = compile("L8 C D4. E");
        assert_eq!(
            ticks(&score),
            vec![
                (0.0, true),
                (420.0, false),
                (480.0, true),
                (1_740.0, false),
                (1_920.0, true),
                (2_340.0, false),
            ]
        );
        assert_eq!(score.total_ticks, 2_400.0);
    }

    #[test]
    fn test_rest_advances_cursor() {
        let score = compile("R4 C R8 R");
        assert_eq!(score.events[0].tick, 960.0);
        assert_eq!(score.total_ticks, 960.0 * 2.0 + 480.0 + 960.0);
    }

    #[test]
    fn test_legato_omits_note_off() {
        let score = compile("C~ D");
        assert_eq!(ticks(&score), vec![(0.0, true), (960.0, true), (1_800.0, false)]);
    }

    #[test]
    fn test_accent_marks_both_events() {
        let score = compile("C! D");
        assert!(score.events[0].accent && score.events[1].accent);
        assert!(!score.events[2].accent);
    }

    #[test]
    fn test_gate_ratio_forms() {
        // Q4 is four eighths; Q0.25 is the ratio itself.
        assert_eq!(compile("Q4 C").events[1].tick, 480.0);
        assert_eq!(compile("Q0.25 C").events[1].tick, 240.0);
        assert_eq!(compile("Q8 C").events[1].tick, 960.0);
    }

    #[test]
    fn test_absolute_gate() {
        // 2/8 of the default length, for every note length.
        let score = compile("Q2! C2 C8");
        assert_eq!(score.events[1].tick, 240.0);
        assert_eq!(score.events[3].tick, 1_920.0 + 240.0);
    }

    #[test]
    fn test_gate_floors_fractional_ticks() {
        // An eleventh note is a fractional number of ticks.
        let score = compile("C11");
        let expected = (3_840.0f64 / 11.0 * 7.0 / 8.0).floor();
        assert_eq!(score.events[1].tick, expected);
    }

    #[test]
    fn test_note_number() {
        let score = compile("N69 N N60");
        let on: Vec<(f64, f32)> = score
            .events
            .iter()
            .filter(|e| e.trigger)
            .map(|e| (e.tick, e.frequency))
            .collect();
        // A bare N is a rest of the default length.
        assert_eq!(on, vec![(0.0, 440.0), (1_920.0, note_hz(60))]);
    }

    #[test]
    fn test_missing_numbers_are_ignored() {
        assert_eq!(compile("O C"), compile("C"));
        assert_eq!(compile("L C"), compile("C"));
        assert_eq!(compile("Q C"), compile("C"));
    }

    #[test]
    fn test_dot_only_length_is_zero() {
        let score = compile("C. D");
        assert_eq!(score.events[0].tick, 0.0);
        assert_eq!(score.events[2].tick, 0.0);
    }

    #[test]
    fn test_tokens_without_delimiters() {
        assert_eq!(compile("C4D4E4"), compile("C4 D4 E4"));
        assert_eq!(compile("C4!~D"), compile("C4!~ D"));
    }

    #[test]
    fn test_events_sorted_when_gate_overshoots() {
        // An absolute gate longer than the note lands after the next note-on.
        let score = compile("Q16! C16 D16");
        assert_eq!(
            ticks(&score),
            vec![(0.0, true), (240.0, true), (1_920.0, false), (2_160.0, false)]
        );
    }

    #[test]
    fn test_tune_a4() {
        let score = CompileConfig::default().with_tune_a4(442.0).compile("A").unwrap();
        assert_eq!(score.events[0].frequency, 442.0);
    }

    #[test]
    fn test_unexpected_character() {
        let err = CompileConfig::default().compile("CX").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnexpectedCharacter {
                character: 'X',
                position: 1,
                input: "CX".to_string(),
            }
        );
    }

    #[test]
    fn test_error_position_counts_chars() {
        let err = CompileConfig::default().compile("C D é").unwrap_err();
        assert_eq!(err.position(), 4);
        assert_eq!(err.character(), 'é');
    }

    #[test]
    fn test_post_modifier_then_length_is_error() {
        // Lengths must come before `!` and `~`.
        let err = CompileConfig::default().compile("C!4").unwrap_err();
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_empty_score() {
        let score = compile(" | \n");
        assert!(score.is_empty());
        assert_eq!(score.total_ticks, 0.0);
    }

    #[test]
    fn test_sequencer_follows_events() {
        let mut mml = Mml::default();
        mml.score("C D", PlayOptions::new()).unwrap();

        mml.play(0.0);
        assert!(mml.trigger());
        assert!((mml.frequency() - note_hz(60)).abs() < 1e-3);

        mml.play(839.0);
        assert!(mml.trigger());
        mml.play(840.0);
        assert!(!mml.trigger());
        assert!((mml.frequency() - note_hz(60)).abs() < 1e-3);

        mml.play(960.0);
        assert!(mml.trigger());
        assert!((mml.frequency() - note_hz(62)).abs() < 1e-3);
    }

    #[test]
    fn test_failed_score_keeps_previous() {
        let mut mml = Mml::default();
        mml.score("C", PlayOptions::new()).unwrap();
        assert!(mml.score("C?", PlayOptions::new()).is_err());
        assert_eq!(mml.events().len(), 2);
    }

    #[test]
    fn test_poll_installs_latest() {
        let mut mml = Mml::default();
        let mut queue: VecDeque<Score> = VecDeque::new();
        assert!(!mml.poll_scores(&mut queue));

        queue.push_back(compile("C"));
        queue.push_back(compile("C D E"));
        assert!(mml.poll_scores(&mut queue));
        assert_eq!(mml.events().len(), 6);
        assert_eq!(mml.loop_length(), 2_880.0);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut mml = Mml::default();
        mml.score("C", PlayOptions::new()).unwrap();
        mml.play(2_000.0);
        mml.reset();
        assert!(!mml.trigger());
        mml.play(0.0);
        assert!(mml.trigger());
    }
}
