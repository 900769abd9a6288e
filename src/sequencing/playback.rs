/*
Playback Cursor
===============

Both sequencers replay a tick-ordered event list the same way. The host
hands `play` one tick per frame; the cursor fires every event whose tick has
been reached since the last call.

    events   0     480   960   1440  1920         (ticks)
             |on   |off  |on   |off  |
    cursor         ^ next_index

Offset and looping
------------------

    t = tick - offset
    if looping:  t = t % loop_length
                 if t went backwards: rewind the cursor to the first event

With looping off, `t` grows forever and the cursor stays at the end once
every event has fired. Looping only applies when `loop_length > 0`.

Firing
------

Every event with `event.tick <= t` fires in order. Each fired event
overwrites the whole status, so only the last one fired in a call is
visible. Calling `play` twice with the same tick fires nothing the second
time.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anything with a position on the tick timeline.
pub trait Timed {
    fn tick(&self) -> f64;
}

/// Playback settings applied when a score is installed.
///
/// Unset fields keep the sequencer's current value, except `loop_length`,
/// which falls back to the score's total length.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayOptions {
    /// Ticks to wait before the score starts.
    pub offset: Option<f64>,
    pub looping: Option<bool>,
    /// Loop period in ticks. Zero means "use the score length".
    pub loop_length: Option<f64>,
}

impl PlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    pub fn loop_length(mut self, loop_length: f64) -> Self {
        self.loop_length = Some(loop_length);
        self
    }
}

/// Cursor over a tick-ordered event list.
#[derive(Debug, Clone)]
pub struct Playback {
    next_index: usize,
    prev_tick: f64,
    offset: f64,
    looping: bool,
    loop_length: f64,
}

impl Playback {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            prev_tick: 0.0,
            offset: 0.0,
            looping: false,
            loop_length: 0.0,
        }
    }

    /// Apply options for a freshly installed score and point the cursor at
    /// its first event.
    pub fn configure(&mut self, options: &PlayOptions, total_ticks: f64) {
        if let Some(offset) = options.offset {
            self.offset = offset;
        }
        if let Some(looping) = options.looping {
            self.looping = looping;
        }
        self.loop_length = match options.loop_length {
            Some(length) if length != 0.0 => length,
            _ => total_ticks,
        };
        self.next_index = 0;
    }

    /// Fire every event due at `tick`, returning the last one fired.
    #[inline]
    pub fn play<'a, E: Timed>(&mut self, tick: f64, events: &'a [E]) -> Option<&'a E> {
        let mut t = tick - self.offset;
        if self.looping && self.loop_length > 0.0 {
            t %= self.loop_length;
            if t < self.prev_tick {
                self.next_index = 0;
            }
        }

        let mut fired = None;
        while let Some(event) = events.get(self.next_index) {
            if event.tick() > t {
                break;
            }
            fired = Some(event);
            self.next_index += 1;
        }

        self.prev_tick = t;
        fired
    }

    /// Back to the first event, as if nothing had played.
    pub fn rewind(&mut self) {
        self.next_index = 0;
        self.prev_tick = 0.0;
    }

    /// Tick of the next event to fire, `None` once exhausted.
    pub fn next_tick<E: Timed>(&self, events: &[E]) -> Option<f64> {
        events.get(self.next_index).map(Timed::tick)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_looping(&self) -> bool {
        self.looping && self.loop_length > 0.0
    }

    pub fn loop_length(&self) -> f64 {
        self.loop_length
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}
