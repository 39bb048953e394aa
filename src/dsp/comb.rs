//! Damped comb filters - the late-reverb generator.
//!
//! Each comb feeds back its own output through a one-pole lowpass, so high
//! frequencies die faster than lows, as they do in a real room:
//!
//! ```text
//! y[n] = rt · ( x[n-d] + (1-g) · ( y[n-d] + g · y[n-d-1] ) )
//!
//!   rt = reverb time (loop gain)
//!   g  = damping · comb gain
//! ```
//!
//! There is no separate filter state: the lowpass is computed from the two
//! samples of the comb's own history at `n-d` and `n-d-1`.
//!
//! The loop gain at DC is `rt · (1 - g²)`, and at Nyquist `rt · (1 - g)²`.
//! With `rt ≤ 1` and `0 ≤ g < 1` neither exceeds one, so the loop cannot
//! grow. Any `g > 0` makes it strictly decaying.
//!
//! Outputs are flushed to zero once they fall below
//! [`DENORMAL_THRESHOLD`](super::DENORMAL_THRESHOLD), so a dying tail ends in
//! exact silence instead of subnormals.

use super::{flush_denormal, seconds_to_samples, DelayFilter, FrameCtx, RingBuffer, WritePos};

/// Delay and base gain of one comb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombTuning {
    pub delay_seconds: f32,
    /// Multiplied by `damping` to get the lowpass coefficient. The damping
    /// range `0..=1.8` maps these to at most `0.99`.
    pub gain: f32,
}

pub const COMB_COUNT: usize = 6;

pub const MOORER_COMBS: [CombTuning; COMB_COUNT] = [
    CombTuning { delay_seconds: 0.05, gain: 0.46 },
    CombTuning { delay_seconds: 0.056, gain: 0.48 },
    CombTuning { delay_seconds: 0.061, gain: 0.50 },
    CombTuning { delay_seconds: 0.068, gain: 0.52 },
    CombTuning { delay_seconds: 0.072, gain: 0.53 },
    CombTuning { delay_seconds: 0.078, gain: 0.55 },
];

/// Longest comb delay, for headroom checks and tail estimates.
pub const MAX_COMB_DELAY_SECONDS: f32 = 0.078;

/// A single comb with lowpass feedback.
#[derive(Debug, Clone)]
pub struct DampedComb {
    tuning: CombTuning,
    delay_samples: usize,
    line: RingBuffer,
}

impl DampedComb {
    pub fn new(tuning: CombTuning) -> Self {
        Self {
            tuning,
            delay_samples: 0,
            line: RingBuffer::default(),
        }
    }

    pub fn tuning(&self) -> CombTuning {
        self.tuning
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }
}

impl DelayFilter for DampedComb {
    #[inline]
    fn step(&mut self, input: &RingBuffer, pos: WritePos, ctx: &FrameCtx) -> f32 {
        let r = pos.back(self.delay_samples);
        let excitation = input.read(r);
        let fb = self.line.read(r);

        let g = ctx.settings.damping * self.tuning.gain;
        let fb_lp = (1.0 - g) * (fb + g * self.line.read(r - 1));

        let y = flush_denormal(ctx.settings.reverb_time * (excitation + fb_lp));
        self.line.write(pos.get(), y);
        y
    }

    fn prepare(&mut self, sample_rate: f32, len: usize) {
        self.delay_samples = seconds_to_samples(self.tuning.delay_seconds, sample_rate);
        self.line.resize(len);
    }

    fn clear(&mut self) {
        self.line.clear();
    }

    fn output(&self) -> &RingBuffer {
        &self.line
    }
}

/// Six combs in parallel, all excited by the early-reflection signal.
///
/// The bank keeps a history of its summed output because the allpass
/// diffuser reads it at a delay.
#[derive(Debug, Clone)]
pub struct CombBank {
    combs: [DampedComb; COMB_COUNT],
    sum: RingBuffer,
}

impl CombBank {
    pub fn new() -> Self {
        Self {
            combs: MOORER_COMBS.map(DampedComb::new),
            sum: RingBuffer::default(),
        }
    }

    pub fn prepare(&mut self, sample_rate: f32, len: usize) {
        for comb in &mut self.combs {
            comb.prepare(sample_rate, len);
        }
        self.sum.resize(len);
    }

    pub fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        self.sum.clear();
    }

    /// Run every comb for `pos` and store their sum.
    #[inline]
    pub fn process(&mut self, early: &RingBuffer, pos: WritePos, ctx: &FrameCtx) -> f32 {
        let mut total = 0.0;
        for comb in &mut self.combs {
            total += comb.step(early, pos, ctx);
        }
        self.sum.write(pos.get(), total);
        total
    }

    pub fn combs(&self) -> &[DampedComb; COMB_COUNT] {
        &self.combs
    }

    /// History of the summed comb output.
    pub fn sum(&self) -> &RingBuffer {
        &self.sum
    }
}

impl Default for CombBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ReverbSettings;

    const SR: f32 = 1_000.0;

    fn ctx(reverb_time: f32, damping: f32) -> FrameCtx {
        FrameCtx {
            sample_rate: SR,
            settings: ReverbSettings {
                reverb_time,
                damping,
                ..ReverbSettings::default()
            },
        }
    }

    /// Impulse response of one comb fed straight from an input line.
    fn impulse_response(comb: &mut DampedComb, ctx: &FrameCtx, len: usize, frames: usize) -> Vec<f32> {
        let mut input = RingBuffer::new(len);
        let mut pos = WritePos::new(len);
        (0..frames)
            .map(|n| {
                input.write(pos.get(), if n == 0 { 1.0 } else { 0.0 });
                let y = comb.step(&input, pos, ctx);
                pos.advance();
                y
            })
            .collect()
    }

    #[test]
    fn test_comb_echo_arrives_after_delay() {
        let mut comb = DampedComb::new(CombTuning { delay_seconds: 0.05, gain: 0.5 });
        comb.prepare(SR, 200);
        assert_eq!(comb.delay_samples(), 50);

        let out = impulse_response(&mut comb, &ctx(0.9, 0.0), 200, 120);
        assert!(out[..50].iter().all(|&s| s == 0.0));
        assert!((out[50] - 0.9).abs() < 1e-6);
        // Undamped: the echo comes back once per period scaled by rt.
        assert!((out[100] - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_damping_spreads_and_shrinks_the_feedback() {
        let tuning = CombTuning { delay_seconds: 0.05, gain: 0.5 };
        let c = ctx(1.0, 1.0); // g = 0.5

        let mut comb = DampedComb::new(tuning);
        comb.prepare(SR, 400);
        let out = impulse_response(&mut comb, &c, 400, 160);

        // First echo is the raw excitation.
        assert!((out[50] - 1.0).abs() < 1e-6);
        // Second pass: (1-g)·y[n-d] at 100, (1-g)·g·y[n-d-1] at 101.
        assert!((out[100] - 0.5).abs() < 1e-6);
        assert!((out[101] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_bank_sum_is_stored() {
        let mut bank = CombBank::new();
        bank.prepare(SR, 200);
        let mut early = RingBuffer::new(200);
        let mut pos = WritePos::new(200);
        let c = ctx(0.875, 0.7);

        for n in 0..120 {
            early.write(pos.get(), if n == 0 { 1.0 } else { 0.0 });
            let total = bank.process(&early, pos, &c);
            let expected: f32 = bank.combs().iter().map(|comb| comb.output().read(pos.get())).sum();
            assert_eq!(bank.sum().read(pos.get()), total);
            assert!((total - expected).abs() < 1e-6);
            pos.advance();
        }
        // 50 ms comb fires first.
        assert!(bank.sum().read(50).abs() > 0.0);
        assert_eq!(bank.sum().read(49), 0.0);
    }
}
