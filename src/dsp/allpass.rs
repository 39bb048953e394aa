use super::{flush_denormal, seconds_to_samples, DelayFilter, FrameCtx, RingBuffer, WritePos};

pub const ALLPASS_DELAY_SECONDS: f32 = 0.006;
pub const ALLPASS_GAIN: f32 = 0.7;

/// Single allpass stage that smears the comb-bank sum in time.
///
/// ```text
/// y[n] = -g · x[n] + x[n-d] + g · y[n-d]
/// ```
///
/// Unity magnitude at every frequency; only the phase changes, which breaks
/// up the periodic "flutter" of the parallel combs.
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    delay_seconds: f32,
    gain: f32,
    delay_samples: usize,
    line: RingBuffer,
}

impl AllpassDiffuser {
    pub fn new() -> Self {
        Self {
            delay_seconds: ALLPASS_DELAY_SECONDS,
            gain: ALLPASS_GAIN,
            delay_samples: 0,
            line: RingBuffer::default(),
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }
}

impl Default for AllpassDiffuser {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayFilter for AllpassDiffuser {
    #[inline]
    fn step(&mut self, input: &RingBuffer, pos: WritePos, _ctx: &FrameCtx) -> f32 {
        let w = pos.get();
        let r = pos.back(self.delay_samples);
        let y = flush_denormal(-self.gain * input.read(w) + input.read(r) + self.gain * self.line.read(r));
        self.line.write(w, y);
        y
    }

    fn prepare(&mut self, sample_rate: f32, len: usize) {
        self.delay_samples = seconds_to_samples(self.delay_seconds, sample_rate);
        self.line.resize(len);
    }

    fn clear(&mut self) {
        self.line.clear();
    }

    fn output(&self) -> &RingBuffer {
        &self.line
    }
}
