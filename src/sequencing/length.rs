//! Note length notation and the lenient number readers used by MML.
//!
//! Lengths are written as note divisions: `4` is a quarter note, `8.` a
//! dotted eighth, `4+8` (or `4^8`) a quarter tied to an eighth, `2-16` a half
//! note shortened by a sixteenth. The result is in ticks, 960 per quarter.

use crate::TICKS_PER_QUARTER;

const WHOLE_NOTE: f64 = 4.0 * TICKS_PER_QUARTER;

/// Convert a length string to ticks.
///
/// Terms are summed left to right. A term whose number is missing or zero
/// contributes nothing, and its digits and dots carry over into the next
/// term (`"0+4"` reads the second term as `04`). Characters other than
/// digits, `.`, `+`, `^` and `-` are ignored.
pub fn parse_length(text: &str) -> f64 {
    let mut total = 0.0;
    let mut adding = true;
    let mut term = Term::default();

    for c in text.chars() {
        match c {
            '0'..='9' => term.push_digit(c),
            '.' => term.dots += 1,
            '+' | '^' | '-' => {
                total += term.flush(adding);
                adding = c != '-';
            }
            _ => {}
        }
    }
    total + term.flush(adding)
}

#[derive(Debug, Default)]
struct Term {
    value: f64,
    has_digits: bool,
    dots: i32,
}

impl Term {
    fn push_digit(&mut self, c: char) {
        self.value = self.value * 10.0 + f64::from(c as u8 - b'0');
        self.has_digits = true;
    }

    /// Signed ticks of the term, consuming it only when it was valid.
    fn flush(&mut self, adding: bool) -> f64 {
        if !self.has_digits || self.value == 0.0 {
            return 0.0;
        }
        let mut length = WHOLE_NOTE / self.value;
        if self.dots > 0 {
            length *= 2.0 - 0.5f64.powi(self.dots);
        }
        *self = Term::default();
        if adding {
            length
        } else {
            -length
        }
    }
}

/// Leading integer of `text`: optional sign then digits, anything after
/// the digits ignored. `None` when there are no digits.
pub(crate) fn parse_int_prefix(text: &str) -> Option<i64> {
    let (negative, rest) = split_sign(text.trim_start());
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

/// Leading decimal of `text`: optional sign, digits, optional fraction.
/// `None` when there are no digits on either side of the point.
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (negative, rest) = split_sign(trimmed);
    let bytes = rest.as_bytes();

    let int_digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}
