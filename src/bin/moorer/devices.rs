//! Device discovery.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait};

pub fn list() -> EyreResult<()> {
    let host = cpal::default_host();
    println!("Host: {:?}", host.id());

    println!("Input devices:");
    for dev in host.input_devices().wrap_err("failed to enumerate input devices")? {
        let name = dev.name().unwrap_or_else(|_| "<unnamed>".into());
        match dev.default_input_config() {
            Ok(cfg) => println!("- {name} ({} ch, {} Hz)", cfg.channels(), cfg.sample_rate().0),
            Err(_) => println!("- {name}"),
        }
    }

    println!("Output devices:");
    for dev in host.output_devices().wrap_err("failed to enumerate output devices")? {
        let name = dev.name().unwrap_or_else(|_| "<unnamed>".into());
        match dev.default_output_config() {
            Ok(cfg) => println!("- {name} ({} ch, {} Hz)", cfg.channels(), cfg.sample_rate().0),
            Err(_) => println!("- {name}"),
        }
    }
    Ok(())
}

pub fn output_device(host: &cpal::Host, name: Option<&str>) -> EyreResult<cpal::Device> {
    match name {
        Some(name) => host
            .output_devices()?
            .find(|d| d.name().is_ok_and(|n| n == name))
            .ok_or_else(|| eyre!("output device not found: {name}")),
        None => host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available")),
    }
}

pub fn input_device(host: &cpal::Host, name: Option<&str>) -> EyreResult<cpal::Device> {
    match name {
        Some(name) => host
            .input_devices()?
            .find(|d| d.name().is_ok_and(|n| n == name))
            .ok_or_else(|| eyre!("input device not found: {name}")),
        None => host
            .default_input_device()
            .ok_or_else(|| eyre!("no default input device available")),
    }
}

/// An input config running at `sample_rate`, preferring the device's
/// default channel count.
pub fn input_config_at(
    device: &cpal::Device,
    sample_rate: cpal::SampleRate,
) -> EyreResult<cpal::SupportedStreamConfig> {
    let default = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    if default.sample_rate() == sample_rate {
        return Ok(default);
    }

    let mut ranges: Vec<_> = device
        .supported_input_configs()
        .wrap_err("failed to query input configs")?
        .filter(|r| r.min_sample_rate() <= sample_rate && sample_rate <= r.max_sample_rate())
        .collect();
    ranges.sort_by_key(|r| (r.channels() != default.channels(), r.sample_format() != cpal::SampleFormat::F32));
    ranges
        .into_iter()
        .next()
        .map(|r| r.with_sample_rate(sample_rate))
        .ok_or_else(|| eyre!("input device cannot run at {} Hz", sample_rate.0))
}
