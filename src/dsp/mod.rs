//! The stages of the Moorer reverberator.
//!
//! All stages are allocation-free once sized and safe to call from the audio
//! callback. Each one owns its own delay memory; none of them owns the write
//! position. The engine holds a single [`WritePos`] and hands a copy of it to
//! every stage for the frame being computed, so all delay lines of all
//! channels are addressed from the same point in time.
//!
//! ```text
//! in ──► [early] ──┬──► [comb ×6] ──► Σ ──► [allpass] ──► (delay 29 ms + predelay) ──┐
//!                  │                                                                 ├─► wet ──► mix ──► out
//!                  └─────────────────────────────────────────────────────────────────┘
//! ```

/// First-order allpass diffuser.
pub mod allpass;
/// Damped feedback comb filters and the six-comb bank.
pub mod comb;
/// Late/early recombination and the dry/wet blend.
pub mod combiner;
/// Six-tap early-reflection generator.
pub mod early;
/// Circular sample buffer with wraparound indexing.
pub mod ring;

use crate::params::ReverbSettings;

pub use ring::RingBuffer;

/// The shared write position, advanced once per sample frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WritePos {
    index: usize,
    len: usize,
}

impl WritePos {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Current write index, always in `0..len`.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// Current write index as a signed raw offset.
    #[inline]
    pub fn get(self) -> isize {
        self.index as isize
    }

    /// Raw (unwrapped) index `delay` samples in the past. Ring buffers wrap
    /// it on access.
    #[inline]
    pub fn back(self, delay: usize) -> isize {
        self.index as isize - delay as isize
    }

    #[inline]
    pub fn advance(&mut self) {
        self.index += 1;
        if self.index >= self.len {
            self.index = 0;
        }
    }

    pub fn len(self) -> usize {
        self.len
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Everything a stage needs to know about the frame being computed.
#[derive(Debug, Clone, Copy)]
pub struct FrameCtx {
    pub sample_rate: f32,
    pub settings: ReverbSettings,
}

/// A filter whose state lives entirely in its own delay line.
///
/// `step` reads the stage input from `input` (a line written by the
/// previous stage at `pos` already), computes this filter's output for
/// `pos`, stores it in its own line and returns it.
pub trait DelayFilter {
    fn step(&mut self, input: &RingBuffer, pos: WritePos, ctx: &FrameCtx) -> f32;

    /// Size the delay line and derive sample delays for `sample_rate`.
    fn prepare(&mut self, sample_rate: f32, len: usize);

    /// Zero the delay line without reallocating.
    fn clear(&mut self);

    /// The filter's own output history.
    fn output(&self) -> &RingBuffer;
}

/// Magnitudes below this are flushed to zero before they enter a feedback line.
pub const DENORMAL_THRESHOLD: f32 = 1.0e-20;

/// Flush tiny values to zero so a decaying tail never reaches subnormal range.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        x
    }
}

/// Seconds to whole samples, truncating toward zero.
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: f32) -> usize {
    (seconds * sample_rate) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_pos_wraps_at_len() {
        let mut pos = WritePos::new(3);
        let seen: Vec<usize> = (0..7)
            .map(|_| {
                let i = pos.index();
                pos.advance();
                i
            })
            .collect();
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_back_can_go_negative() {
        let pos = WritePos::new(100);
        assert_eq!(pos.back(5), -5);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(f32::MIN_POSITIVE / 2.0), 0.0);
        assert_eq!(flush_denormal(-1.0e-25), 0.0);
        assert_eq!(flush_denormal(1.0e-6), 1.0e-6);
        assert_eq!(flush_denormal(-0.5), -0.5);
    }

    #[test]
    fn test_seconds_truncate() {
        assert_eq!(seconds_to_samples(0.02, 48_000.0), 960);
        assert_eq!(seconds_to_samples(0.006, 44_100.0), 264);
        assert_eq!(seconds_to_samples(0.0001, 8_000.0), 0);
    }
}
