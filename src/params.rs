//! Engine parameters shared between the control surface and the audio thread.
//!
//! The four controls are plain scalars. The control thread stores each one
//! with a single relaxed atomic write and the audio path reads whatever
//! value is currently visible, once per sample frame. There is no locking
//! and no smoothing, so a change can land in the middle of a block and take
//! effect on the very next frame.
//!
//! ```text
//!  control thread                 audio thread
//!  ─────────────                  ────────────
//!  params.set(Damping, 1.1) ──►   AtomicU32 ──► params.snapshot() (every frame)
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ReverbError;

/// Identifies one of the four reverb controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Gain applied inside every comb loop; sets the decay rate.
    ReverbTime,
    /// Seconds added to every early-reflection tap and to the late alignment.
    Predelay,
    /// Scales each comb's lowpass coefficient (higher = darker tail).
    Damping,
    /// Dry/wet crossfade.
    WetMix,
}

impl ParamId {
    pub const ALL: [ParamId; 4] = [
        ParamId::ReverbTime,
        ParamId::Predelay,
        ParamId::Damping,
        ParamId::WetMix,
    ];

    /// Stable textual id used by hosts.
    pub fn id(self) -> &'static str {
        match self {
            ParamId::ReverbTime => "reverbtime",
            ParamId::Predelay => "predelay1",
            ParamId::Damping => "damping",
            ParamId::WetMix => "wetmix",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::ReverbTime => "Reverb Time",
            ParamId::Predelay => "Predelay",
            ParamId::Damping => "Damping",
            ParamId::WetMix => "Wet Mix",
        }
    }

    /// Inclusive `(min, max)` in engine units.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamId::ReverbTime => (0.5, 1.0),
            ParamId::Predelay => (0.0005, 0.1),
            ParamId::Damping => (0.0, 1.8),
            ParamId::WetMix => (0.0, 1.0),
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamId::ReverbTime => 0.875,
            ParamId::Predelay => 0.02,
            ParamId::Damping => 0.7,
            ParamId::WetMix => 1.0,
        }
    }

    /// Clamp into range. NaN falls back to the default.
    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    // ---- Display units -------------------------------------------------------
    //
    // The knobs show friendlier units than the engine consumes:
    //
    // | param       | display          | engine value     |
    // | ----------- | ---------------- | ---------------- |
    // | reverb time | 0.2 .. 4.0 s     | s / 8 + 0.5      |
    // | predelay    | 0.5 .. 100 ms    | ms / 1000        |
    // | damping     | 0 .. 100 %       | pct / 100 + 0.5  |
    // | wet mix     | 0 .. 100 %       | pct / 100        |

    pub fn unit(self) -> &'static str {
        match self {
            ParamId::ReverbTime => "s",
            ParamId::Predelay => "ms",
            ParamId::Damping | ParamId::WetMix => "%",
        }
    }

    /// Inclusive `(min, max)` of the knob in display units.
    pub fn display_range(self) -> (f32, f32) {
        match self {
            ParamId::ReverbTime => (0.2, 4.0),
            ParamId::Predelay => (0.5, 100.0),
            ParamId::Damping | ParamId::WetMix => (0.0, 100.0),
        }
    }

    /// Knob resolution in display units.
    pub fn display_step(self) -> f32 {
        match self {
            ParamId::ReverbTime => 0.02,
            ParamId::Predelay => 0.5,
            ParamId::Damping | ParamId::WetMix => 1.0,
        }
    }

    /// Convert a knob position to an engine value (both ends clamped).
    pub fn from_display(self, display: f32) -> f32 {
        let (lo, hi) = self.display_range();
        let d = if display.is_nan() { lo } else { display.clamp(lo, hi) };
        let raw = match self {
            ParamId::ReverbTime => d / 8.0 + 0.5,
            ParamId::Predelay => d / 1000.0,
            ParamId::Damping => d / 100.0 + 0.5,
            ParamId::WetMix => d / 100.0,
        };
        self.clamp(raw)
    }

    /// Inverse of [`from_display`](Self::from_display). Not clamped to the
    /// knob range: engine values outside the knob's reach (damping below
    /// 0.5, say) are shown as they are.
    pub fn to_display(self, value: f32) -> f32 {
        let v = self.clamp(value);
        match self {
            ParamId::ReverbTime => (v - 0.5) * 8.0,
            ParamId::Predelay => v * 1000.0,
            ParamId::Damping => (v - 0.5) * 100.0,
            ParamId::WetMix => v * 100.0,
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ParamId {
    type Err = ReverbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "reverbtime" | "time" | "rt" => Ok(ParamId::ReverbTime),
            "predelay1" | "predelay" => Ok(ParamId::Predelay),
            "damping" | "damp" => Ok(ParamId::Damping),
            "wetmix" | "wet" | "mix" => Ok(ParamId::WetMix),
            _ => Err(ReverbError::UnknownParameter(s.to_string())),
        }
    }
}

/// Plain copy of all four controls, read once per frame by the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub reverb_time: f32,
    pub predelay: f32,
    pub damping: f32,
    pub wet_mix: f32,
}

impl ReverbSettings {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::ReverbTime => self.reverb_time,
            ParamId::Predelay => self.predelay,
            ParamId::Damping => self.damping,
            ParamId::WetMix => self.wet_mix,
        }
    }

    pub fn with(mut self, id: ParamId, value: f32) -> Self {
        let slot = match id {
            ParamId::ReverbTime => &mut self.reverb_time,
            ParamId::Predelay => &mut self.predelay,
            ParamId::Damping => &mut self.damping,
            ParamId::WetMix => &mut self.wet_mix,
        };
        *slot = value;
        self
    }

    /// Every field forced into its documented range.
    pub fn clamped(self) -> Self {
        Self {
            reverb_time: ParamId::ReverbTime.clamp(self.reverb_time),
            predelay: ParamId::Predelay.clamp(self.predelay),
            damping: ParamId::Damping.clamp(self.damping),
            wet_mix: ParamId::WetMix.clamp(self.wet_mix),
        }
    }

    /// Small, bright room with a mostly dry blend.
    pub fn room() -> Self {
        Self {
            reverb_time: 0.7,
            predelay: 0.008,
            damping: 1.2,
            wet_mix: 0.35,
        }
    }

    /// The plugin defaults at half mix.
    pub fn hall() -> Self {
        Self {
            wet_mix: 0.5,
            ..Self::default()
        }
    }

    /// Long, dense and lightly damped.
    pub fn plate() -> Self {
        Self {
            reverb_time: 0.95,
            predelay: 0.0005,
            damping: 0.4,
            wet_mix: 0.6,
        }
    }

    pub const PRESET_NAMES: [&'static str; 4] = ["default", "room", "hall", "plate"];

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "room" => Some(Self::room()),
            "hall" => Some(Self::hall()),
            "plate" => Some(Self::plate()),
            _ => None,
        }
    }
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            reverb_time: ParamId::ReverbTime.default_value(),
            predelay: ParamId::Predelay.default_value(),
            damping: ParamId::Damping.default_value(),
            wet_mix: ParamId::WetMix.default_value(),
        }
    }
}

/// `f32` stored as its bit pattern in an `AtomicU32`.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Live parameter set, shared via `Arc` between the engine and its controllers.
///
/// Writers may call [`set`](Self::set) from any thread at any time; the
/// audio path never blocks on them.
#[derive(Debug)]
pub struct ReverbParams {
    reverb_time: AtomicF32,
    predelay: AtomicF32,
    damping: AtomicF32,
    wet_mix: AtomicF32,
}

impl ReverbParams {
    pub fn new(settings: ReverbSettings) -> Self {
        let s = settings.clamped();
        Self {
            reverb_time: AtomicF32::new(s.reverb_time),
            predelay: AtomicF32::new(s.predelay),
            damping: AtomicF32::new(s.damping),
            wet_mix: AtomicF32::new(s.wet_mix),
        }
    }

    fn slot(&self, id: ParamId) -> &AtomicF32 {
        match id {
            ParamId::ReverbTime => &self.reverb_time,
            ParamId::Predelay => &self.predelay,
            ParamId::Damping => &self.damping,
            ParamId::WetMix => &self.wet_mix,
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.slot(id).load()
    }

    /// Store a new value, clamped into range. NaN is ignored.
    #[inline]
    pub fn set(&self, id: ParamId, value: f32) {
        if value.is_nan() {
            return;
        }
        self.slot(id).store(id.clamp(value));
    }

    pub fn set_by_name(&self, name: &str, value: f32) -> Result<(), ReverbError> {
        let id: ParamId = name.parse()?;
        self.set(id, value);
        Ok(())
    }

    pub fn reset_to_default(&self, id: ParamId) {
        self.set(id, id.default_value());
    }

    /// Read all four controls. Called by the engine once per frame.
    #[inline]
    pub fn snapshot(&self) -> ReverbSettings {
        ReverbSettings {
            reverb_time: self.reverb_time.load(),
            predelay: self.predelay.load(),
            damping: self.damping.load(),
            wet_mix: self.wet_mix.load(),
        }
        .clamped()
    }

    pub fn load(&self, settings: &ReverbSettings) {
        for id in ParamId::ALL {
            self.set(id, settings.get(id));
        }
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::new(ReverbSettings::default())
    }
}
