//! Live host: capture → reverb → playback, with a terminal control surface.
//!
//! ```text
//!  input callback ──rtrb──► output callback ──► device
//!                           (MoorerReverb)
//!                                 │ mono mix
//!                                 └──rtrb──► UI (scope, meter)
//!  UI ──► Arc<ReverbParams> ──► engine (read once per frame)
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use moorer_reverb::{ChannelLayout, MoorerReverb, ReverbParams, MAX_BLOCK_SIZE, MAX_CHANNELS};
use rtrb::{Consumer, Producer, RingBuffer};

use super::cli::LiveArgs;
use super::devices;
use super::ui::{LiveInfo, UiApp, VIS_BUFFER_SIZE};

/// Scope ring capacity, in visualisation buffers.
const SCOPE_RING_BLOCKS: usize = 8;

pub fn run(args: &LiveArgs) -> EyreResult<()> {
    let host = cpal::default_host();
    let output = devices::output_device(&host, args.output_device.as_deref())?;
    let input = devices::input_device(&host, args.input_device.as_deref())?;

    let out_supported = output
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = out_supported.sample_rate();
    let in_supported = devices::input_config_at(&input, sample_rate)?;

    let out_channels = out_supported.channels() as usize;
    let in_channels = in_supported.channels() as usize;
    let layout = ChannelLayout::from_channels(out_channels.clamp(1, MAX_CHANNELS))?;
    let width = layout.channels();

    let params = Arc::new(ReverbParams::new(args.reverb.settings()));
    let mut reverb = MoorerReverb::with_params(Arc::clone(&params));
    reverb.configure(sample_rate.0 as f32)?;

    // Input → output ring, prefilled with the requested latency.
    let latency_frames = ((args.latency_ms.max(0.0) / 1000.0) * sample_rate.0 as f32) as usize;
    let ring_frames = (latency_frames * 4).max(MAX_BLOCK_SIZE * 2);
    let (mut capture_tx, capture_rx) = RingBuffer::<f32>::new(ring_frames * width);
    for _ in 0..latency_frames * width {
        let _ = capture_tx.push(0.0);
    }

    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * SCOPE_RING_BLOCKS);
    let underruns = Arc::new(AtomicUsize::new(0));

    let in_config: cpal::StreamConfig = in_supported.config();
    let out_config: cpal::StreamConfig = out_supported.config();
    log::info!(
        "live: {} Hz, {in_channels} in / {out_channels} out, engine {layout:?}, {latency_frames} frames latency",
        sample_rate.0
    );

    let input_stream = match in_supported.sample_format() {
        cpal::SampleFormat::F32 => build_input::<f32>(&input, &in_config, width, capture_tx)?,
        cpal::SampleFormat::I16 => build_input::<i16>(&input, &in_config, width, capture_tx)?,
        cpal::SampleFormat::U16 => build_input::<u16>(&input, &in_config, width, capture_tx)?,
        other => return Err(eyre!("unsupported input sample format: {other:?}")),
    };

    let callback = OutputCallback {
        reverb,
        capture_rx,
        scope_tx,
        underruns: Arc::clone(&underruns),
        scratch: vec![0.0; MAX_BLOCK_SIZE * width],
        width,
    };
    let output_stream = match out_supported.sample_format() {
        cpal::SampleFormat::F32 => build_output::<f32>(&output, &out_config, callback)?,
        cpal::SampleFormat::I16 => build_output::<i16>(&output, &out_config, callback)?,
        cpal::SampleFormat::U16 => build_output::<u16>(&output, &out_config, callback)?,
        other => return Err(eyre!("unsupported output sample format: {other:?}")),
    };

    input_stream.play().wrap_err("failed to start input stream")?;
    output_stream.play().wrap_err("failed to start output stream")?;

    let info = LiveInfo {
        input_name: input.name().unwrap_or_else(|_| "<unnamed>".into()),
        output_name: output.name().unwrap_or_else(|_| "<unnamed>".into()),
        sample_rate: sample_rate.0 as f32,
        layout,
        latency_ms: latency_frames as f32 * 1000.0 / sample_rate.0 as f32,
    };

    let mut terminal = ratatui::init();
    let res = UiApp::new(params, scope_rx, underruns, info).run(&mut terminal);
    ratatui::restore();

    drop(output_stream);
    drop(input_stream);
    res
}

/// Fold device input frames onto the engine's bus and queue them.
fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    width: usize,
    mut tx: Producer<f32>,
) -> EyreResult<cpal::Stream>
where
    T: SizedSample + Send + 'static,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for frame in data.chunks_exact(channels) {
                // Whole frames only, so the reader never splits L from R.
                if tx.slots() < width {
                    break;
                }
                if width == 1 {
                    let sum: f32 = frame.iter().map(|&s| f32::from_sample_(s)).sum();
                    let _ = tx.push(sum / channels as f32);
                } else {
                    for ch in 0..width {
                        let _ = tx.push(f32::from_sample_(frame[ch.min(channels - 1)]));
                    }
                }
            }
        },
        |err| log::error!("input stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

/// State moved into the output callback. Allocated once, up front.
struct OutputCallback {
    reverb: MoorerReverb,
    capture_rx: Consumer<f32>,
    scope_tx: Producer<f32>,
    underruns: Arc<AtomicUsize>,
    scratch: Vec<f32>,
    width: usize,
}

impl OutputCallback {
    /// Fill `block` with up to `frames` frames of captured input, zero on underrun.
    fn pull(&mut self, frames: usize) {
        let width = self.width;
        let block = &mut self.scratch[..frames * width];
        let mut short = false;
        for frame in block.chunks_exact_mut(width) {
            if self.capture_rx.slots() >= width {
                for s in frame.iter_mut() {
                    *s = self.capture_rx.pop().unwrap_or(0.0);
                }
            } else {
                frame.fill(0.0);
                short = true;
            }
        }
        if short {
            self.underruns.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn render<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        let width = self.width;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            self.pull(frames);

            let block = &mut self.scratch[..frames * width];
            if self.reverb.process_interleaved(block, width).is_err() {
                block.fill(0.0);
            }

            let out_off = frames_written * channels;
            for (i, frame) in block.chunks_exact(width).enumerate() {
                let out = &mut data[out_off + i * channels..out_off + (i + 1) * channels];
                for (ch, sample) in out.iter_mut().enumerate() {
                    let s = match width {
                        1 => frame[0],
                        _ if ch < width => frame[ch],
                        _ => 0.0,
                    };
                    *sample = T::from_sample(s.clamp(-1.0, 1.0));
                }

                // Mono mix to the scope, drop on overflow.
                let mono = frame.iter().sum::<f32>() / width as f32;
                let _ = self.scope_tx.push(mono);
            }

            frames_written += frames;
        }
    }
}

fn build_output<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut callback: OutputCallback,
) -> EyreResult<cpal::Stream>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let channels = config.channels as usize;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| callback.render(data, channels),
        |err| log::error!("output stream error: {err}"),
        None,
    )?;
    Ok(stream)
}
