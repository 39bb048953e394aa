//! Benchmarks for the individual delay-line stages.

mod allpass;
mod comb;
mod early;

pub use allpass::bench_allpass;
pub use comb::bench_comb_bank;
pub use early::bench_early;

use moorer_reverb::dsp::FrameCtx;
use moorer_reverb::{ReverbSettings, MAX_DELAY_SECONDS};

use crate::SAMPLE_RATE;

pub fn line_len() -> usize {
    (MAX_DELAY_SECONDS * SAMPLE_RATE) as usize
}

pub fn frame_ctx(settings: ReverbSettings) -> FrameCtx {
    FrameCtx {
        sample_rate: SAMPLE_RATE,
        settings,
    }
}
