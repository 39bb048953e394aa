use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use moorer_reverb::dsp::early::EarlyReflections;
use moorer_reverb::dsp::WritePos;

use super::line_len;
use crate::{test_input, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_early(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/early");
    let len = line_len();

    for &size in BLOCK_SIZES {
        let input = test_input(size);

        for (label, predelay) in [("short_predelay", 0.0005), ("long_predelay", 0.1)] {
            let mut early = EarlyReflections::new();
            early.prepare(len);
            let mut pos = WritePos::new(len);
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += early.process(black_box(sample), pos, SAMPLE_RATE, predelay);
                        pos.advance();
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
