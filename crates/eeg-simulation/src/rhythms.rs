//! Pre-defined EEG rhythm mixtures for synthetic recordings

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// One oscillatory component of the simulated EEG
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RhythmComponent {
    /// Oscillation frequency (Hz)
    pub frequency_hz: f64,
    /// Peak amplitude (µV)
    pub amplitude_uv: f64,
    /// Phase advance between neighbouring channels (radians)
    pub channel_phase_step: f64,
}

impl RhythmComponent {
    pub const fn new(frequency_hz: f64, amplitude_uv: f64) -> Self {
        Self {
            frequency_hz,
            amplitude_uv,
            channel_phase_step: 0.35,
        }
    }

    /// Value at `time` seconds on channel `channel`
    pub fn value_at(&self, time: f64, channel: usize) -> f64 {
        let phase = self.channel_phase_step * channel as f64;
        self.amplitude_uv * (2.0 * PI * self.frequency_hz * time + phase).sin()
    }

    /// Mean squared amplitude of the component (µV²)
    pub fn power(&self) -> f64 {
        self.amplitude_uv * self.amplitude_uv / 2.0
    }
}

/// Brain-state presets, each dominated by one canonical band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RhythmPattern {
    /// Relaxed wakefulness with eyes closed: strong alpha
    EyesClosedRest,
    /// Light drowsiness: theta takes over
    Drowsy,
    /// Slow-wave sleep: large delta waves
    DeepSleep,
    /// Active concentration: beta
    FocusedTask,
    /// Arbitrary mixture
    Custom(Vec<RhythmComponent>),
}

impl RhythmPattern {
    /// Oscillations making up this pattern
    pub fn components(&self) -> Vec<RhythmComponent> {
        match self {
            RhythmPattern::EyesClosedRest => vec![
                RhythmComponent::new(10.0, 20.0),
                RhythmComponent::new(6.0, 5.0),
                RhythmComponent::new(2.0, 6.0),
                RhythmComponent::new(20.0, 3.0),
            ],
            RhythmPattern::Drowsy => vec![
                RhythmComponent::new(6.0, 15.0),
                RhythmComponent::new(10.0, 5.0),
                RhythmComponent::new(2.0, 5.0),
            ],
            RhythmPattern::DeepSleep => vec![
                RhythmComponent::new(2.0, 40.0),
                RhythmComponent::new(5.0, 8.0),
            ],
            RhythmPattern::FocusedTask => vec![
                RhythmComponent::new(20.0, 10.0),
                RhythmComponent::new(10.0, 4.0),
                RhythmComponent::new(6.0, 3.0),
            ],
            RhythmPattern::Custom(components) => components.clone(),
        }
    }

    /// Sum of all components at `time` seconds on channel `channel`
    pub fn value_at(&self, time: f64, channel: usize) -> f64 {
        self.components()
            .iter()
            .map(|c| c.value_at(time, channel))
            .sum()
    }

    /// Name of the canonical band this preset is dominated by
    pub fn expected_dominant_band(&self) -> Option<&'static str> {
        match self {
            RhythmPattern::EyesClosedRest => Some("Alpha"),
            RhythmPattern::Drowsy => Some("Theta"),
            RhythmPattern::DeepSleep => Some("Delta"),
            RhythmPattern::FocusedTask => Some("Beta"),
            RhythmPattern::Custom(_) => None,
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            RhythmPattern::EyesClosedRest => "Eyes-closed rest (alpha)",
            RhythmPattern::Drowsy => "Drowsiness (theta)",
            RhythmPattern::DeepSleep => "Deep sleep (delta)",
            RhythmPattern::FocusedTask => "Focused task (beta)",
            RhythmPattern::Custom(_) => "Custom mixture",
        }
    }

    /// Create common preset patterns
    pub fn presets() -> Vec<(&'static str, RhythmPattern)> {
        vec![
            ("rest", RhythmPattern::EyesClosedRest),
            ("drowsy", RhythmPattern::Drowsy),
            ("sleep", RhythmPattern::DeepSleep),
            ("focus", RhythmPattern::FocusedTask),
        ]
    }
}

impl Default for RhythmPattern {
    fn default() -> Self {
        RhythmPattern::EyesClosedRest
    }
}

impl fmt::Display for RhythmPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for RhythmPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RhythmPattern::presets()
            .into_iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, pattern)| pattern)
            .ok_or_else(|| {
                let names: Vec<_> = RhythmPattern::presets().iter().map(|(n, _)| *n).collect();
                format!("unknown rhythm pattern '{}', expected one of: {}", s, names.join(", "))
            })
    }
}
