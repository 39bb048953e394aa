use thiserror::Error;

/// Errors reported by the reverb engine and its host-facing helpers.
///
/// Everything returned from the audio path is allocation-free; only the
/// by-name parameter lookup (a control-thread API) carries a `String`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReverbError {
    #[error("engine used before configure() sized its delay lines")]
    NotConfigured,

    #[error("sample rate {0} Hz cannot hold the reverb delay lines")]
    InvalidSampleRate(f32),

    #[error("unsupported channel count {0} (expected 1 or 2)")]
    UnsupportedChannelCount(usize),

    #[error("unsupported bus layout: {inputs} in / {outputs} out")]
    UnsupportedLayout { inputs: usize, outputs: usize },

    #[error("channel buffers differ in length: expected {expected}, found {found}")]
    ChannelLengthMismatch { expected: usize, found: usize },

    #[error("interleaved buffer of {len} samples is not a whole number of {channels}-channel frames")]
    FrameMisaligned { len: usize, channels: usize },

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
}
