//! Command-line surface.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use moorer_reverb::{ParamId, ReverbSettings};

#[derive(Parser, Debug)]
#[command(name = "moorer", version, about = "Moorer reverberator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a WAV file offline
    Render(RenderArgs),
    /// Run the reverb between an input and an output device
    Live(LiveArgs),
    /// List audio devices
    Devices,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Mono or stereo WAV to read
    pub input: PathBuf,
    /// Destination, written as 32-bit float
    pub output: PathBuf,
    /// Seconds of silence to run after the input ends (defaults to the
    /// estimated decay time)
    #[arg(long)]
    pub tail: Option<f32>,
    #[command(flatten)]
    pub reverb: ReverbArgs,
}

#[derive(Args, Debug)]
pub struct LiveArgs {
    /// Capture device name (default input if omitted)
    #[arg(long)]
    pub input_device: Option<String>,
    /// Playback device name (default output if omitted)
    #[arg(long)]
    pub output_device: Option<String>,
    /// Input-to-output buffering
    #[arg(long, default_value_t = 20.0)]
    pub latency_ms: f32,
    #[command(flatten)]
    pub reverb: ReverbArgs,
}

/// Starting parameter values: a preset, then individual overrides in
/// engine units.
#[derive(Args, Debug, Clone)]
pub struct ReverbArgs {
    #[arg(long, default_value = "default", value_parser = PossibleValuesParser::new(ReverbSettings::PRESET_NAMES))]
    pub preset: String,
    /// Comb loop gain, 0.5 ..= 1.0
    #[arg(long)]
    pub reverb_time: Option<f32>,
    /// Seconds, 0.0005 ..= 0.1
    #[arg(long)]
    pub predelay: Option<f32>,
    /// 0.0 ..= 1.8
    #[arg(long)]
    pub damping: Option<f32>,
    /// 0.0 (dry) ..= 1.0 (wet)
    #[arg(long)]
    pub wet_mix: Option<f32>,
}

impl ReverbArgs {
    pub fn settings(&self) -> ReverbSettings {
        let mut settings = ReverbSettings::preset(&self.preset).unwrap_or_default();
        let overrides = [
            (ParamId::ReverbTime, self.reverb_time),
            (ParamId::Predelay, self.predelay),
            (ParamId::Damping, self.damping),
            (ParamId::WetMix, self.wet_mix),
        ];
        for (id, value) in overrides {
            let Some(value) = value else { continue };
            let clamped = id.clamp(value);
            if clamped != value {
                log::warn!("{id} = {value} is out of range, using {clamped}");
            }
            settings = settings.with(id, clamped);
        }
        settings
    }
}
