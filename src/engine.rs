//! The reverb engine: owns every delay line and the shared write position,
//! and runs the stages frame by frame.
//!
//! Lifecycle:
//!
//! 1. [`MoorerReverb::configure`] once the sample rate is known. This is the
//!    only place that allocates.
//! 2. [`MoorerReverb::process_block`] / [`MoorerReverb::process_interleaved`]
//!    from the audio callback, in place.
//! 3. `configure` again whenever the sample rate changes.
//!
//! Parameters live in an `Arc<ReverbParams>` that any thread may write; the
//! engine reads all four once per frame.

use std::sync::Arc;

use crate::dsp::allpass::AllpassDiffuser;
use crate::dsp::comb::{CombBank, MAX_COMB_DELAY_SECONDS, MOORER_COMBS};
use crate::dsp::combiner::{aligned_late, blend, wet_signal, LATE_ALIGNMENT_SECONDS};
use crate::dsp::early::{EarlyReflections, MAX_TAP_OFFSET_SECONDS};
use crate::dsp::{seconds_to_samples, DelayFilter, FrameCtx, RingBuffer, WritePos};
use crate::error::ReverbError;
use crate::layout::ChannelLayout;
use crate::params::{ParamId, ReverbParams, ReverbSettings};
use crate::{MAX_CHANNELS, MAX_DELAY_SECONDS};

/// Cap for [`MoorerReverb::tail_seconds`] when the loop does not decay.
pub const MAX_TAIL_SECONDS: f32 = 30.0;

/// Per-channel delay memory. Channels never read each other's lines.
#[derive(Debug, Clone, Default)]
struct ChannelState {
    early: EarlyReflections,
    combs: CombBank,
    diffuser: AllpassDiffuser,
}

impl ChannelState {
    fn prepare(&mut self, sample_rate: f32, len: usize) {
        self.early.prepare(len);
        self.combs.prepare(sample_rate, len);
        self.diffuser.prepare(sample_rate, len);
    }

    fn clear(&mut self) {
        self.early.clear();
        self.combs.clear();
        self.diffuser.clear();
    }

    #[inline]
    fn step(&mut self, dry: f32, pos: WritePos, ctx: &FrameCtx) -> f32 {
        let s = &ctx.settings;
        let early = self.early.process(dry, pos, ctx.sample_rate, s.predelay);
        self.combs.process(self.early.output(), pos, ctx);
        self.diffuser.step(self.combs.sum(), pos, ctx);

        let late = aligned_late(self.diffuser.output(), pos, ctx.sample_rate, s.predelay);
        blend(dry, wet_signal(early, late), s.wet_mix)
    }
}

/// Read-only view of one channel's delay lines, for inspection and tests.
#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
    state: &'a ChannelState,
}

impl<'a> StageView<'a> {
    /// Dry input history.
    pub fn input(&self) -> &'a RingBuffer {
        self.state.early.input()
    }

    /// Early-reflection history.
    pub fn early(&self) -> &'a RingBuffer {
        self.state.early.output()
    }

    /// Output history of comb `index` (0..6).
    pub fn comb(&self, index: usize) -> Option<&'a RingBuffer> {
        self.state.combs.combs().get(index).map(|c| c.output())
    }

    /// Summed comb-bank history.
    pub fn comb_sum(&self) -> &'a RingBuffer {
        self.state.combs.sum()
    }

    /// Allpass output history.
    pub fn diffused(&self) -> &'a RingBuffer {
        self.state.diffuser.output()
    }
}

/// Moorer reverberator for mono or stereo streams.
///
/// ```
/// use moorer_reverb::{MoorerReverb, ParamId};
///
/// # fn main() -> Result<(), moorer_reverb::ReverbError> {
/// let mut reverb = MoorerReverb::new();
/// reverb.configure(48_000.0)?;
/// reverb.params().set(ParamId::WetMix, 0.4);
///
/// let (mut left, mut right) = (vec![0.0f32; 256], vec![0.0f32; 256]);
/// left[0] = 1.0;
/// reverb.process_block(&mut [&mut left[..], &mut right[..]])?;
/// assert!(right.iter().all(|&s| s == 0.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MoorerReverb {
    params: Arc<ReverbParams>,
    channels: [ChannelState; MAX_CHANNELS],
    pos: WritePos,
    sample_rate: f32,
}

impl MoorerReverb {
    pub fn new() -> Self {
        Self::with_params(Arc::new(ReverbParams::default()))
    }

    /// Build an engine that reads from an existing parameter set.
    pub fn with_params(params: Arc<ReverbParams>) -> Self {
        Self {
            params,
            channels: Default::default(),
            pos: WritePos::default(),
            sample_rate: 0.0,
        }
    }

    pub fn with_settings(settings: ReverbSettings) -> Self {
        Self::with_params(Arc::new(ReverbParams::new(settings)))
    }

    /// Handle for control threads.
    pub fn params(&self) -> &Arc<ReverbParams> {
        &self.params
    }

    /// Set a parameter by host id (`"reverbtime"`, `"predelay1"`, ...).
    pub fn set_parameter(&self, name: &str, value: f32) -> Result<(), ReverbError> {
        self.params.set_by_name(name, value)
    }

    /// Size every delay line for `sample_rate` (200 ms each) and clear them.
    ///
    /// Allocates; call it before streaming starts, never from the callback.
    pub fn configure(&mut self, sample_rate: f32) -> Result<(), ReverbError> {
        let len = buffer_len_for(sample_rate)?;

        for channel in &mut self.channels {
            channel.prepare(sample_rate, len);
        }
        self.pos = WritePos::new(len);
        self.sample_rate = sample_rate;

        log::debug!("configured reverb at {sample_rate} Hz with {len}-sample delay lines");
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.pos.is_empty()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Length of every delay line, 0 before `configure`.
    pub fn buffer_len(&self) -> usize {
        self.pos.len()
    }

    /// Current shared write index.
    pub fn write_index(&self) -> usize {
        self.pos.index()
    }

    /// Silence every delay line and rewind the write position. No allocation.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
        self.pos = WritePos::new(self.pos.len());
        log::trace!("reverb state cleared");
    }

    pub fn channel(&self, index: usize) -> Option<StageView<'_>> {
        self.channels.get(index).map(|state| StageView { state })
    }

    /// Process planar channels in place. All channels must have the same length.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) -> Result<(), ReverbError> {
        if !self.is_configured() {
            return Err(ReverbError::NotConfigured);
        }
        let layout = ChannelLayout::from_channels(channels.len())?;
        let frames = channels[0].len();
        if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
            return Err(ReverbError::ChannelLengthMismatch {
                expected: frames,
                found: bad.len(),
            });
        }

        for n in 0..frames {
            let ctx = self.frame_ctx();
            for (buffer, state) in channels.iter_mut().zip(&mut self.channels[..layout.channels()]) {
                buffer[n] = state.step(buffer[n], self.pos, &ctx);
            }
            self.pos.advance();
        }
        Ok(())
    }

    /// Process an interleaved buffer of `channels`-wide frames in place.
    pub fn process_interleaved(&mut self, data: &mut [f32], channels: usize) -> Result<(), ReverbError> {
        if !self.is_configured() {
            return Err(ReverbError::NotConfigured);
        }
        let layout = ChannelLayout::from_channels(channels)?;
        if data.len() % channels != 0 {
            return Err(ReverbError::FrameMisaligned {
                len: data.len(),
                channels,
            });
        }

        for frame in data.chunks_exact_mut(layout.channels()) {
            let ctx = self.frame_ctx();
            for (sample, state) in frame.iter_mut().zip(&mut self.channels) {
                *sample = state.step(*sample, self.pos, &ctx);
            }
            self.pos.advance();
        }
        Ok(())
    }

    #[inline]
    fn frame_ctx(&self) -> FrameCtx {
        FrameCtx {
            sample_rate: self.sample_rate,
            settings: self.params.snapshot(),
        }
    }

    /// Time for the tail to fall 60 dB after the input stops, for the
    /// current settings. Capped at [`MAX_TAIL_SECONDS`].
    ///
    /// Uses each comb's loop gain at DC, `rt · (1 - g²)`, which is the
    /// slowest-decaying frequency.
    pub fn tail_seconds(&self) -> f32 {
        let s = self.params.snapshot();
        let decay = MOORER_COMBS
            .iter()
            .map(|comb| {
                let g = s.damping * comb.gain;
                let loop_gain = s.reverb_time * (1.0 - g * g);
                if loop_gain >= 1.0 {
                    MAX_TAIL_SECONDS
                } else {
                    comb.delay_seconds * (-3.0 / loop_gain.log10())
                }
            })
            .fold(0.0f32, f32::max);
        (s.predelay + LATE_ALIGNMENT_SECONDS + decay).min(MAX_TAIL_SECONDS)
    }

    /// Current value of a parameter.
    pub fn parameter(&self, id: ParamId) -> f32 {
        self.params.get(id)
    }
}

impl Default for MoorerReverb {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay-line length for `sample_rate`, checked against the longest read
/// any stage can make.
fn buffer_len_for(sample_rate: f32) -> Result<usize, ReverbError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ReverbError::InvalidSampleRate(sample_rate));
    }
    let len = seconds_to_samples(MAX_DELAY_SECONDS, sample_rate);
    if len < 2 {
        return Err(ReverbError::InvalidSampleRate(sample_rate));
    }

    let (_, max_predelay) = ParamId::Predelay.range();
    let longest = [
        seconds_to_samples(max_predelay + MAX_TAP_OFFSET_SECONDS, sample_rate),
        seconds_to_samples(MAX_COMB_DELAY_SECONDS, sample_rate) + 1,
        seconds_to_samples(LATE_ALIGNMENT_SECONDS + max_predelay, sample_rate),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);
    debug_assert!(longest < len, "delay of {longest} samples does not fit {len}");

    Ok(len)
}
