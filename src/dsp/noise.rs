//! Xorshift pseudo-random source for noise and randomized reverb taps.
//!
//! Not suitable for anything but audio: the point is a few integer ops per
//! sample with no allocation and a reproducible sequence per seed.

const DEFAULT_SEED: u32 = 0x9E37_79B9;

#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// A zero seed would lock the generator at zero, so it is replaced.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in [0, 1).
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        // Top 24 bits fit exactly in an f32 mantissa.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in [-1, 1).
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        self.next_unit() * 2.0 - 1.0
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
