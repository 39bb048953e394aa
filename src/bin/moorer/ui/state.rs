//! Static facts about the running session, gathered once at startup.

use moorer_reverb::ChannelLayout;

#[derive(Clone, Debug)]
pub struct LiveInfo {
    pub input_name: String,
    pub output_name: String,
    /// Shared by both streams
    pub sample_rate: f32,
    /// Bus the engine runs on
    pub layout: ChannelLayout,
    pub latency_ms: f32,
}
