//! Realtime Moorer reverberator.
//!
//! A tapped-delay early-reflection generator feeds six damped comb filters
//! in parallel; their sum is diffused by an allpass, realigned behind the
//! early reflections and blended with the dry signal. See [`dsp`] for the
//! stages and [`MoorerReverb`] for the engine that runs them.

pub mod dsp; // Delay-line stages
pub mod engine;
pub mod error;
pub mod layout;
pub mod params; // Shared, lock-free controls

pub use engine::{MoorerReverb, StageView};
pub use error::ReverbError;
pub use layout::ChannelLayout;
pub use params::{ParamId, ReverbParams, ReverbSettings};

/// Largest block the host binary hands to the engine at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Length of every delay line, in seconds of audio.
pub const MAX_DELAY_SECONDS: f32 = 0.2;
/// Mono or stereo.
pub const MAX_CHANNELS: usize = 2;
