/*
Rhythm Patterns
===============

A drum part is written as one pattern string per track, one character per
step, all tracks stepping together:

    kick   "x--- x--- x--- x-x-"
    snare  "---- X--- ---- X---"
    hat    "x.x. x.x. x.x. xxxX"

    -  .    rest
    a..z    hit
    A..Z    accented hit
    | and whitespace separate columns for readability and are skipped

Steps are `step_ticks` apart (a sixteenth by default). Every step that has
at least one hit becomes a pulse: an on-event carrying every track's hit
and accent flags, and an all-false off-event one tick later. Tracks of
different lengths are fine; once a track runs out it reads as rests until
the longest track ends.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CompileError;
use super::playback::{PlayOptions, Playback, Timed};
use crate::host::MessageReceiver;
use crate::TICKS_PER_QUARTER;

/// Per-track trigger and accent flags at one tick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmEvent {
    pub tick: f64,
    /// One entry per track.
    pub trigger: Vec<bool>,
    /// One entry per track.
    pub accent: Vec<bool>,
}

impl Timed for RhythmEvent {
    fn tick(&self) -> f64 {
        self.tick
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RhythmScore {
    pub events: Vec<RhythmEvent>,
    /// Number of steps times the step length.
    pub total_ticks: f64,
    pub tracks: usize,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhythmConfig {
    /// Distance between steps in ticks.
    pub step_ticks: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            step_ticks: TICKS_PER_QUARTER / 4.0,
        }
    }
}

impl RhythmConfig {
    pub fn with_step_ticks(mut self, step_ticks: f64) -> Self {
        self.step_ticks = step_ticks;
        self
    }

    /// Compile one pattern per track into a merged event list.
    pub fn compile<S: AsRef<str>>(&self, patterns: &[S]) -> Result<RhythmScore, CompileError> {
        let tracks = patterns.len();
        let mut readers: Vec<_> = patterns.iter().map(|p| p.as_ref().chars().enumerate()).collect();
        let mut events = Vec::new();
        let mut tick = 0.0;

        loop {
            let mut trigger = vec![false; tracks];
            let mut accent = vec![false; tracks];
            let mut stepped = false;

            for (track, reader) in readers.iter_mut().enumerate() {
                let Some((position, c)) = reader.find(|&(_, c)| !is_separator(c)) else {
                    continue;
                };
                stepped = true;

                match c {
                    '-' | '.' => {}
                    c if c.is_ascii_alphabetic() => {
                        trigger[track] = true;
                        accent[track] = c.is_ascii_uppercase();
                    }
                    _ => {
                        return Err(CompileError::UnexpectedStep {
                            track,
                            character: c,
                            position,
                            input: patterns[track].as_ref().to_string(),
                        });
                    }
                }
            }

            if !stepped {
                break;
            }
            if trigger.contains(&true) {
                events.push(RhythmEvent {
                    tick,
                    trigger,
                    accent,
                });
                events.push(RhythmEvent {
                    tick: tick + 1.0,
                    trigger: vec![false; tracks],
                    accent: vec![false; tracks],
                });
            }
            tick += self.step_ticks;
        }

        debug!(tracks, events = events.len(), total_ticks = tick, "compiled rhythm score");
        Ok(RhythmScore {
            events,
            total_ticks: tick,
            tracks,
        })
    }
}

fn is_separator(c: char) -> bool {
    c == '|' || c.is_whitespace()
}

/// Multi-track trigger sequencer.
pub struct Rhythm {
    config: RhythmConfig,
    score: RhythmScore,
    playback: Playback,

    triggers: Vec<bool>,
    accents: Vec<bool>,
}

impl Rhythm {
    pub fn new() -> Self {
        Self::with_config(RhythmConfig::default())
    }

    pub fn with_config(config: RhythmConfig) -> Self {
        Self {
            config,
            score: RhythmScore::default(),
            playback: Playback::new(),
            triggers: Vec::new(),
            accents: Vec::new(),
        }
    }

    /// Compile and install one pattern per track. On error the current
    /// score stays.
    pub fn score<S: AsRef<str>>(&mut self, patterns: &[S], options: PlayOptions) -> Result<(), CompileError> {
        let score = self.config.compile(patterns)?;
        self.set_score(score, options);
        Ok(())
    }

    /// Install a precompiled score, returning the one it replaces.
    pub fn set_score(&mut self, score: RhythmScore, options: PlayOptions) -> RhythmScore {
        self.playback.configure(&options, score.total_ticks);
        self.triggers.clear();
        self.triggers.resize(score.tracks, false);
        self.accents.clear();
        self.accents.resize(score.tracks, false);
        debug!(
            tracks = score.tracks,
            loop_length = self.playback.loop_length(),
            looping = self.playback.is_looping(),
            "installed rhythm score"
        );
        std::mem::replace(&mut self.score, score)
    }

    /// Install the newest score waiting in `receiver`, if any.
    pub fn poll_scores<R: MessageReceiver<RhythmScore>>(&mut self, receiver: &mut R) -> bool {
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
            self.triggers.clone_from(&event.trigger);
            self.accents.clone_from(&event.accent);
        }
    }

    pub fn reset(&mut self) {
        self.playback.rewind();
        self.triggers.fill(false);
        self.accents.fill(false);
    }

    /// `false` for tracks the score does not have.
    pub fn trigger(&self, track: usize) -> bool {
        self.triggers.get(track).copied().unwrap_or(false)
    }

    pub fn accent(&self, track: usize) -> bool {
        self.accents.get(track).copied().unwrap_or(false)
    }

    pub fn triggers(&self) -> &[bool] {
        &self.triggers
    }

    pub fn accents(&self) -> &[bool] {
        &self.accents
    }

    pub fn tracks(&self) -> usize {
        self.score.tracks
    }

    pub fn events(&self) -> &[RhythmEvent] {
        &self.score.events
    }

    pub fn loop_length(&self) -> f64 {
        self.playback.loop_length()
    }
}

impl Default for Rhythm {
    fn default() -> Self {
        Self::new()
    }
}
