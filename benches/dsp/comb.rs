use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use moorer_reverb::dsp::comb::CombBank;
use moorer_reverb::dsp::{RingBuffer, WritePos};
use moorer_reverb::ReverbSettings;

use super::{frame_ctx, line_len};
use crate::{test_input, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_comb_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/comb_bank");
    let len = line_len();

    for &size in BLOCK_SIZES {
        let input = test_input(size);

        // Light damping (bright, long tail)
        let light = frame_ctx(ReverbSettings {
            reverb_time: 0.95,
            damping: 0.2,
            ..ReverbSettings::default()
        });
        // Heavy damping (dark)
        let heavy = frame_ctx(ReverbSettings {
            reverb_time: 0.7,
            damping: 1.8,
            ..ReverbSettings::default()
        });

        for (label, ctx) in [("light_damping", light), ("heavy_damping", heavy)] {
            let mut bank = CombBank::new();
            bank.prepare(SAMPLE_RATE, len);
            let mut excitation = RingBuffer::new(len);
            let mut pos = WritePos::new(len);
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        excitation.write(pos.get(), black_box(sample));
                        sum += bank.process(&excitation, pos, &ctx);
                        pos.advance();
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
