//! Whole-engine benchmarks, shaped like the host's audio callback.

mod engine;

pub use engine::{bench_engine, bench_presets};
