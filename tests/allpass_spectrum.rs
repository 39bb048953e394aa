use moorer_reverb::dsp::allpass::AllpassDiffuser;
use moorer_reverb::dsp::{DelayFilter, FrameCtx, RingBuffer, WritePos};
use moorer_reverb::ReverbSettings;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const SAMPLE_RATE: f32 = 8_000.0;
const LEN: usize = 1_600;
const FFT_SIZE: usize = 4_096;

fn allpass_impulse_response(frames: usize) -> Vec<f32> {
    let mut diffuser = AllpassDiffuser::new();
    diffuser.prepare(SAMPLE_RATE, LEN);
    let ctx = FrameCtx {
        sample_rate: SAMPLE_RATE,
        settings: ReverbSettings::default(),
    };
    let mut input = RingBuffer::new(LEN);
    let mut pos = WritePos::new(LEN);
    (0..frames)
        .map(|n| {
            input.write(pos.get(), if n == 0 { 1.0 } else { 0.0 });
            let y = diffuser.step(&input, pos, &ctx);
            pos.advance();
            y
        })
        .collect()
}

#[test]
fn allpass_magnitude_is_flat() {
    let response = allpass_impulse_response(FFT_SIZE);

    let mut spectrum: Vec<Complex<f64>> = response
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(FFT_SIZE).process(&mut spectrum);

    for (bin, value) in spectrum.iter().enumerate().take(FFT_SIZE / 2 + 1) {
        let magnitude = value.norm();
        assert!(
            (magnitude - 1.0).abs() < 1e-3,
            "bin {bin}: |H| = {magnitude}"
        );
    }
}

#[test]
fn allpass_is_not_a_plain_delay() {
    // Flat magnitude but frequency-dependent phase: the response is spread
    // over many echoes rather than concentrated in one sample.
    let response = allpass_impulse_response(FFT_SIZE);
    let nonzero = response.iter().filter(|s| s.abs() > 1e-4).count();
    assert!(nonzero > 10, "only {nonzero} non-zero taps");
}
