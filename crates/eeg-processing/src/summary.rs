//! Display scalars derived from a recording and its band decomposition

use crate::decomposer::{dominant_band, BandDecomposition, BandPower};
use eeg_core::EegSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recording info and band powers, ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSummary {
    /// `(samples - 1) / sampling_rate`, in seconds
    pub duration_secs: f64,
    pub sampling_rate: f64,
    pub channel_count: usize,
    pub dominant_band: Option<String>,
    pub band_powers: Vec<BandPower>,
}

impl RecordingSummary {
    pub fn new(signal: &EegSignal, decomposition: &BandDecomposition) -> Self {
        let band_powers = decomposition.band_powers();
        let dominant = dominant_band(&band_powers).map(|p| p.band.name.clone());

        RecordingSummary {
            duration_secs: signal.duration(),
            sampling_rate: signal.sampling_rate(),
            channel_count: signal.channel_count(),
            dominant_band: dominant,
            band_powers,
        }
    }
}

impl fmt::Display for RecordingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recording Info:")?;
        writeln!(f, "  Duration: {:.1} sec", self.duration_secs)?;
        writeln!(f, "  Sampling: {:.1} Hz", self.sampling_rate)?;
        writeln!(f, "  Channels: {}", self.channel_count)?;
        writeln!(f)?;
        writeln!(f, "Dominant Band: {}", self.dominant_band.as_deref().unwrap_or("-"))?;
        writeln!(f)?;

        writeln!(f, "Frequency Bands:")?;
        let width = self
            .band_powers
            .iter()
            .map(|p| p.band.name.len())
            .max()
            .unwrap_or(0);
        for entry in &self.band_powers {
            let label = format!("{}:", entry.band.name);
            writeln!(f, "  {:<w$} {:.2e} µV²", label, entry.power, w = width + 1)?;
            if !entry.band.description.is_empty() {
                writeln!(f, "  {:<w$} {}", "", entry.band.description, w = width + 1)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposer::decompose;
    use eeg_core::FrequencyBand;
    use std::f64::consts::PI;

    fn alpha_signal() -> EegSignal {
        let fs = 100.0;
        let row: Vec<f64> = (0..1000)
            .map(|i| 10.0 * (2.0 * PI * 10.0 * i as f64 / fs).sin())
            .collect();
        EegSignal::from_channels(vec![row.clone(), row], fs, vec!["O1".into(), "O2".into()]).unwrap()
    }

    #[test]
    fn test_summary_scalars() {
        let signal = alpha_signal();
        let decomposition = decompose(&signal, &FrequencyBand::canonical()).unwrap();
        let summary = RecordingSummary::new(&signal, &decomposition);

        assert!((summary.duration_secs - 9.99).abs() < 1e-12);
        assert_eq!(summary.sampling_rate, 100.0);
        assert_eq!(summary.channel_count, 2);
        assert_eq!(summary.dominant_band.as_deref(), Some("Alpha"));
        assert_eq!(summary.band_powers.len(), 4);
    }

    #[test]
    fn test_summary_rendering() {
        let signal = alpha_signal();
        let decomposition = decompose(&signal, &FrequencyBand::canonical()).unwrap();
        let text = RecordingSummary::new(&signal, &decomposition).to_string();

        assert!(text.contains("Recording Info:"));
        assert!(text.contains("Duration: 10.0 sec"));
        assert!(text.contains("Sampling: 100.0 Hz"));
        assert!(text.contains("Channels: 2"));
        assert!(text.contains("Dominant Band: Alpha"));
        assert!(text.contains("Frequency Bands:"));
        assert!(text.contains("Relaxation"));
        assert_eq!(text.matches("µV²").count(), 4);
    }
}
