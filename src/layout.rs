//! Bus layouts the reverb can run in.
//!
//! The filter topology is per-channel and symmetric: what comes in on a
//! channel goes out on the same channel. Only mono and stereo are accepted,
//! and input and output counts must match.

use crate::error::ReverbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    #[inline]
    pub fn from_channels(channels: usize) -> Result<Self, ReverbError> {
        match channels {
            1 => Ok(ChannelLayout::Mono),
            2 => Ok(ChannelLayout::Stereo),
            n => Err(ReverbError::UnsupportedChannelCount(n)),
        }
    }

    /// Accept a host's proposed input/output bus pair.
    pub fn negotiate(inputs: usize, outputs: usize) -> Result<Self, ReverbError> {
        if inputs != outputs {
            log::warn!("rejecting asymmetric bus layout {inputs} in / {outputs} out");
            return Err(ReverbError::UnsupportedLayout { inputs, outputs });
        }
        Self::from_channels(outputs).map_err(|_| {
            log::warn!("rejecting {outputs}-channel bus layout");
            ReverbError::UnsupportedLayout { inputs, outputs }
        })
    }
}
