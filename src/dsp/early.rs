//! Early reflections - a six-tap FIR over the dry input.
//!
//! The taps follow the early-reflection pattern Moorer recommends in
//! "About This Reverberation Business" (1979). His reflections sit at
//! 19.9, 35.4, 38.9, 41.4, 69.9 and 79.6 ms; the offsets below are those
//! times minus the first one, so the `predelay` control decides where the
//! whole pattern starts.
//!
//! ```text
//! e[n] = x[n] + Σ gain[i] · x[n - ⌊(predelay + offset[i]) · sr⌋]
//! ```
//!
//! The output line keeps a history of `e[n]`; the comb bank reads it at
//! its own delays and the output combiner reads it at `n`.

use super::{seconds_to_samples, RingBuffer, WritePos};

/// One early-reflection tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayTap {
    /// Offset after the predelay, in seconds.
    pub offset_seconds: f32,
    pub gain: f32,
}

impl DelayTap {
    pub const fn new(offset_seconds: f32, gain: f32) -> Self {
        Self {
            offset_seconds,
            gain,
        }
    }
}

pub const TAP_COUNT: usize = 6;

pub const MOORER_TAPS: [DelayTap; TAP_COUNT] = [
    DelayTap::new(0.0, 0.921),
    DelayTap::new(0.0155, 0.818),
    DelayTap::new(0.019, 0.635),
    DelayTap::new(0.0215, 0.719),
    DelayTap::new(0.05, 0.267),
    DelayTap::new(0.0597, 0.242),
];

/// Largest tap offset, for headroom checks.
pub const MAX_TAP_OFFSET_SECONDS: f32 = 0.0597;

#[derive(Debug, Clone, Default)]
pub struct EarlyReflections {
    input: RingBuffer,
    output: RingBuffer,
}

impl EarlyReflections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, len: usize) {
        self.input.resize(len);
        self.output.resize(len);
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
    }

    /// Store `dry` at `pos` and build the early-reflection sample for it.
    #[inline]
    pub fn process(&mut self, dry: f32, pos: WritePos, sample_rate: f32, predelay: f32) -> f32 {
        let w = pos.get();
        self.input.write(w, dry);

        // Seeded with the direct sound.
        let mut acc = dry;
        for tap in &MOORER_TAPS {
            let delay = seconds_to_samples(predelay + tap.offset_seconds, sample_rate);
            acc += tap.gain * self.input.read(pos.back(delay));
        }

        self.output.write(w, acc);
        acc
    }

    /// Raw dry input history.
    pub fn input(&self) -> &RingBuffer {
        &self.input
    }

    /// History of the early-reflection signal.
    pub fn output(&self) -> &RingBuffer {
        &self.output
    }
}
