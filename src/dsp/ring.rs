/// Map any raw index (including negative ones) into `0..len`.
///
/// Equivalent to `((index % len) + len) % len`. Plain `%` would keep the sign
/// of a negative index, which is exactly what delay lookups produce when
/// they reach back past the start of the buffer.
#[inline]
pub fn wrap(index: isize, len: usize) -> usize {
    debug_assert!(len > 0, "wrap on an unsized ring buffer");
    index.rem_euclid(len as isize) as usize
}

/// Fixed-length circular sample buffer.
///
/// The buffer does not track its own write head; callers address it with
/// raw indices derived from the engine's shared write position, and every
/// access wraps.
#[derive(Debug, Clone, Default)]
pub struct RingBuffer {
    buffer: Vec<f32>,
}

impl RingBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Resize to `len` samples of silence. Only reallocates when growing past
    /// the current capacity; never call this from the audio path.
    pub fn resize(&mut self, len: usize) {
        self.buffer.clear();
        self.buffer.resize(len, 0.0);
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    #[inline]
    pub fn read(&self, index: isize) -> f32 {
        self.buffer[wrap(index, self.buffer.len())]
    }

    #[inline]
    pub fn write(&mut self, index: isize, value: f32) {
        let i = wrap(index, self.buffer.len());
        self.buffer[i] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_matches_double_modulo() {
        let len = 7usize;
        let l = len as isize;
        for i in -3 * l..3 * l {
            assert_eq!(wrap(i, len) as isize, ((i % l) + l) % l, "index {i}");
        }
    }

    #[test]
    fn test_negative_reads_land_at_the_end() {
        let mut ring = RingBuffer::new(4);
        ring.write(3, 0.5);
        assert_eq!(ring.read(-1), 0.5);
        assert_eq!(ring.read(-5), 0.5);
        assert_eq!(ring.read(7), 0.5);
    }

    #[test]
    fn test_resize_clears_history() {
        let mut ring = RingBuffer::new(8);
        ring.write(2, 1.0);
        ring.resize(16);
        assert_eq!(ring.len(), 16);
        assert!(ring.as_slice().iter().all(|&s| s == 0.0));
    }
}
