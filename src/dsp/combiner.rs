//! Output stage: line the late tail up behind the early reflections, then
//! blend with the dry signal.
//!
//! ```text
//! late = diffused[n - ⌊(0.029 + predelay) · sr⌋]
//! wet  = 0.15 · (early[n] + late)
//! out  = (1 - mix) · dry + mix · wet
//! ```
//!
//! The 29 ms offset makes the first late reflection arrive right after the
//! last early one. `0.15` is fixed makeup gain that keeps the summed paths
//! out of clipping.

use super::{seconds_to_samples, RingBuffer, WritePos};

pub const LATE_ALIGNMENT_SECONDS: f32 = 0.029;
pub const WET_GAIN: f32 = 0.15;

/// Read the diffused tail, delayed to sit behind the early reflections.
#[inline]
pub fn aligned_late(diffused: &RingBuffer, pos: WritePos, sample_rate: f32, predelay: f32) -> f32 {
    let delay = seconds_to_samples(LATE_ALIGNMENT_SECONDS + predelay, sample_rate);
    diffused.read(pos.back(delay))
}

#[inline]
pub fn wet_signal(early: f32, late: f32) -> f32 {
    WET_GAIN * (early + late)
}

/// Linear dry/wet crossfade.
#[inline]
pub fn blend(dry: f32, wet: f32, wet_mix: f32) -> f32 {
    (1.0 - wet_mix) * dry + wet_mix * wet
}
