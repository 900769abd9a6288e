/// Fixed-size history of recent samples for delay and feedback taps.
///
/// Capacity is rounded up to a power of two so wraparound is a mask. Reading
/// further back than `capacity - 1` silently wraps onto newer data; size the
/// buffer for the longest tap you need.
pub struct RingBuffer {
    buffer: Vec<f32>,
    mask: usize,
    write_pos: usize,
}

impl RingBuffer {
    pub fn new(size: usize) -> Self {
        let capacity = size.max(1).next_power_of_two();
        Self {
            buffer: vec![0.0; capacity],
            mask: capacity - 1,
            write_pos: 0,
        }
    }

    /// Overwrite the oldest slot.
    #[inline]
    pub fn push(&mut self, value: f32) {
        self.buffer[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) & self.mask;
    }

    /// Value pushed `offset` pushes ago; `get(0)` is the newest.
    #[inline]
    pub fn get(&self, offset: usize) -> f32 {
        // write_pos points one past the newest sample.
        let index = self.write_pos.wrapping_sub(offset).wrapping_sub(1) & self.mask;
        self.buffer[index]
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(RingBuffer::new(1000).capacity(), 1024);
        assert_eq!(RingBuffer::new(1024).capacity(), 1024);
        assert_eq!(RingBuffer::new(0).capacity(), 1);
    }

    #[test]
    fn newest_and_oldest_after_partial_fill() {
        let mut ring = RingBuffer::new(8);
        for v in 1..=5 {
            ring.push(v as f32);
        }
        assert_eq!(ring.get(0), 5.0);
        assert_eq!(ring.get(4), 1.0);
    }

    #[test]
    fn full_buffer_keeps_last_capacity_values() {
        let mut ring = RingBuffer::new(4);
        for v in 0..10 {
            ring.push(v as f32);
        }
        assert_eq!(ring.get(0), 9.0);
        assert_eq!(ring.get(3), 6.0);
        // Past the end wraps back onto the newest value.
        assert_eq!(ring.get(4), 9.0);
    }

    #[test]
    fn clear_zeroes_history() {
        let mut ring = RingBuffer::new(4);
        ring.push(1.0);
        ring.clear();
        assert_eq!(ring.get(0), 0.0);
    }
}
