//! Offline rendering through the same block path the live host uses.

use std::io::Read;
use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use moorer_reverb::{ChannelLayout, MoorerReverb, MAX_BLOCK_SIZE};

use super::cli::RenderArgs;

pub fn run(args: &RenderArgs) -> EyreResult<()> {
    let mut reader = WavReader::open(&args.input)
        .wrap_err_with(|| format!("failed to open {}", args.input.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let layout = ChannelLayout::negotiate(channels, channels)
        .wrap_err_with(|| format!("{} has {channels} channels", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    let mut samples = read_samples(&mut reader)
        .wrap_err_with(|| format!("failed to decode {}", args.input.display()))?;
    let input_frames = samples.len() / channels;

    let settings = args.reverb.settings();
    let mut reverb = MoorerReverb::with_settings(settings);
    reverb.configure(sample_rate)?;

    let tail = args.tail.unwrap_or_else(|| reverb.tail_seconds()).max(0.0);
    let tail_frames = (tail * sample_rate) as usize;
    samples.resize((input_frames + tail_frames) * channels, 0.0);

    for block in samples.chunks_mut(MAX_BLOCK_SIZE * channels) {
        reverb.process_interleaved(block, channels)?;
    }

    write_float_wav(&args.output, spec.channels, spec.sample_rate, &samples)
        .wrap_err_with(|| format!("failed to write {}", args.output.display()))?;

    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    log::info!(
        "rendered {} frames ({input_frames} input + {tail_frames} tail) of {layout:?} audio at {} Hz with {settings:?}",
        samples.len() / channels,
        spec.sample_rate,
    );
    if peak > 1.0 {
        log::warn!("output peaks at {peak:.3}, above full scale");
    } else {
        log::info!("output peak {peak:.3}");
    }
    println!("wrote {}", args.output.display());
    Ok(())
}

/// Decode every sample to `f32` in -1.0..1.0, keeping the interleaving.
fn read_samples<R: Read>(reader: &mut WavReader<R>) -> Result<Vec<f32>, hound::Error> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect(),
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect()
        }
    }
}

fn write_float_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[f32]) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()
}
