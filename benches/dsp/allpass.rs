use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use moorer_reverb::dsp::allpass::AllpassDiffuser;
use moorer_reverb::dsp::{DelayFilter, RingBuffer, WritePos};
use moorer_reverb::ReverbSettings;

use super::{frame_ctx, line_len};
use crate::{test_input, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_allpass(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/allpass");
    let len = line_len();
    let ctx = frame_ctx(ReverbSettings::default());

    for &size in BLOCK_SIZES {
        let input = test_input(size);
        let mut diffuser = AllpassDiffuser::new();
        diffuser.prepare(SAMPLE_RATE, len);
        let mut source = RingBuffer::new(len);
        let mut pos = WritePos::new(len);

        group.bench_with_input(BenchmarkId::new("diffuse", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    source.write(pos.get(), black_box(sample));
                    sum += diffuser.step(&source, pos, &ctx);
                    pos.advance();
                }
                sum
            })
        });
    }

    group.finish();
}
