//! Physiological frequency bands

use serde::{Deserialize, Serialize};
use crate::error::{EegError, EegResult};

/// A named frequency range `[low_hz, high_hz)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub name: String,
    pub low_hz: f64,
    pub high_hz: f64,
    /// Short physiological interpretation, shown next to the band power
    #[serde(default)]
    pub description: String,
}

impl FrequencyBand {
    pub fn new(name: &str, low_hz: f64, high_hz: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            low_hz,
            high_hz,
            description: description.to_string(),
        }
    }

    /// Delta, 0.5-4 Hz
    pub fn delta() -> Self {
        Self::new("Delta", 0.5, 4.0, "Deep sleep")
    }

    /// Theta, 4-8 Hz
    pub fn theta() -> Self {
        Self::new("Theta", 4.0, 8.0, "Meditation")
    }

    /// Alpha, 8-13 Hz
    pub fn alpha() -> Self {
        Self::new("Alpha", 8.0, 13.0, "Relaxation")
    }

    /// Beta, 13-30 Hz
    pub fn beta() -> Self {
        Self::new("Beta", 13.0, 30.0, "Focus")
    }

    /// The canonical EEG bands in declaration order.
    ///
    /// The order is significant: it breaks ties when picking a dominant band.
    pub fn canonical() -> Vec<FrequencyBand> {
        vec![Self::delta(), Self::theta(), Self::alpha(), Self::beta()]
    }

    pub fn width(&self) -> f64 {
        self.high_hz - self.low_hz
    }

    pub fn contains(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.low_hz && frequency_hz < self.high_hz
    }

    /// Check the band edges without reference to a sampling rate
    pub fn validate(&self) -> EegResult<()> {
        if !self.low_hz.is_finite() || self.low_hz <= 0.0 {
            return Err(EegError::invalid_parameter(
                "band_low_hz",
                self.low_hz,
                format!("{} band: low edge must be positive and finite", self.name),
            ));
        }
        if !self.high_hz.is_finite() || self.high_hz <= self.low_hz {
            return Err(EegError::invalid_parameter(
                "band_high_hz",
                self.high_hz,
                format!("{} band: high edge must be finite and above {} Hz", self.name, self.low_hz),
            ));
        }
        Ok(())
    }

    /// Check the band edges against the Nyquist frequency of `sampling_rate`
    pub fn validate_for(&self, sampling_rate: f64) -> EegResult<()> {
        self.validate()?;
        let nyquist = sampling_rate / 2.0;
        if self.high_hz >= nyquist {
            return Err(EegError::invalid_parameter(
                "band_high_hz",
                self.high_hz,
                format!("{} band: high edge must be below Nyquist ({} Hz)", self.name, nyquist),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}-{} Hz)", self.name, self.low_hz, self.high_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let names: Vec<_> = FrequencyBand::canonical().into_iter().map(|b| b.name).collect();
        assert_eq!(names, ["Delta", "Theta", "Alpha", "Beta"]);
    }

    #[test]
    fn test_canonical_bands_valid_at_100hz() {
        for band in FrequencyBand::canonical() {
            assert!(band.validate_for(100.0).is_ok(), "{} should be valid", band);
        }
    }

    #[test]
    fn test_band_above_nyquist_rejected() {
        let beta = FrequencyBand::beta();
        let err = beta.validate_for(60.0).unwrap_err();
        assert!(matches!(err, EegError::InvalidFilterParameter { parameter: "band_high_hz", .. }));
    }

    #[test]
    fn test_degenerate_bands_rejected() {
        assert!(FrequencyBand::new("Bad", 0.0, 4.0, "").validate().is_err());
        assert!(FrequencyBand::new("Bad", 8.0, 8.0, "").validate().is_err());
        assert!(FrequencyBand::new("Bad", 8.0, f64::NAN, "").validate().is_err());
    }

    #[test]
    fn test_contains_is_half_open() {
        let alpha = FrequencyBand::alpha();
        assert!(alpha.contains(8.0));
        assert!(alpha.contains(12.9));
        assert!(!alpha.contains(13.0));
        assert_eq!(alpha.width(), 5.0);
    }
}
