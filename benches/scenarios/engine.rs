use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use moorer_reverb::{MoorerReverb, ReverbSettings};

use crate::{test_input, BLOCK_SIZES, SAMPLE_RATE};

fn configured(settings: ReverbSettings) -> MoorerReverb {
    let mut reverb = MoorerReverb::with_settings(settings);
    reverb
        .configure(SAMPLE_RATE)
        .expect("benchmark sample rate is valid");
    reverb
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let input = test_input(size);

        // === MONO ===
        let mut reverb = configured(ReverbSettings::default());
        let mut mono = input.clone();
        group.bench_with_input(BenchmarkId::new("mono", size), &size, |b, _| {
            b.iter(|| {
                mono.copy_from_slice(&input);
                reverb
                    .process_block(&mut [black_box(&mut mono[..])])
                    .expect("mono block");
            })
        });

        // === STEREO (planar) ===
        let mut reverb = configured(ReverbSettings::default());
        let (mut left, mut right) = (input.clone(), input.clone());
        group.bench_with_input(BenchmarkId::new("stereo_planar", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                reverb
                    .process_block(&mut [black_box(&mut left[..]), black_box(&mut right[..])])
                    .expect("stereo block");
            })
        });

        // === STEREO (interleaved, as a device callback sees it) ===
        let mut reverb = configured(ReverbSettings::default());
        let interleaved: Vec<f32> = input.iter().flat_map(|&s| [s, s]).collect();
        let mut scratch = interleaved.clone();
        group.bench_with_input(BenchmarkId::new("stereo_interleaved", size), &size, |b, _| {
            b.iter(|| {
                scratch.copy_from_slice(&interleaved);
                reverb
                    .process_interleaved(black_box(&mut scratch), 2)
                    .expect("interleaved block");
            })
        });
    }

    group.finish();
}

pub fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/presets");
    let size = 256;
    let input = test_input(size);

    for name in ReverbSettings::PRESET_NAMES {
        let Some(settings) = ReverbSettings::preset(name) else {
            continue;
        };
        let mut reverb = configured(settings);
        let (mut left, mut right) = (input.clone(), input.clone());
        group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                reverb
                    .process_block(&mut [&mut left[..], &mut right[..]])
                    .expect("stereo block");
            })
        });
    }

    group.finish();
}
