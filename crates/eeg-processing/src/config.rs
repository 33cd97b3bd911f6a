//! Configuration management for EEG processing

use crate::filters::MAX_FILTER_ORDER;
use crate::spectrum::WelchConfig;
use eeg_core::{EegError, EegResult, FrequencyBand};
use serde::{Deserialize, Serialize};

/// Parameters of the conditioning stage (high-pass, low-pass, notch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditioningConfig {
    /// High-pass cutoff removing DC offset and slow drift (Hz)
    pub highpass_hz: f64,
    /// Low-pass cutoff removing high-frequency noise (Hz)
    pub lowpass_hz: f64,
    /// Powerline frequency to notch out, `None` to skip the notch
    pub notch_hz: Option<f64>,
    /// Notch quality factor
    pub notch_q: f64,
    /// Also notch every powerline harmonic below Nyquist
    pub notch_harmonics: bool,
    /// Butterworth order of the high-pass and low-pass stages
    pub filter_order: usize,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        ConditioningConfig {
            highpass_hz: 1.0,
            lowpass_hz: 40.0,
            notch_hz: Some(60.0),
            notch_q: 30.0,
            notch_harmonics: false,
            filter_order: 4,
        }
    }
}

impl ConditioningConfig {
    /// Same conditioning with a different powerline frequency
    pub fn with_powerline(mut self, notch_hz: f64) -> Self {
        self.notch_hz = Some(notch_hz);
        self
    }

    /// Checks that do not depend on the sampling rate
    pub fn validate(&self) -> EegResult<()> {
        positive("highpass_hz", self.highpass_hz)?;
        positive("lowpass_hz", self.lowpass_hz)?;
        if self.highpass_hz >= self.lowpass_hz {
            return Err(EegError::invalid_parameter(
                "highpass_hz",
                self.highpass_hz,
                format!("must be below the low-pass cutoff ({} Hz)", self.lowpass_hz),
            ));
        }
        if let Some(notch) = self.notch_hz {
            positive("notch_hz", notch)?;
        }
        positive("notch_q", self.notch_q)?;
        order("filter_order", self.filter_order)
    }

    /// Full check against a recording's sampling rate
    pub fn validate_for(&self, sampling_rate: f64) -> EegResult<()> {
        self.validate()?;
        below_nyquist("highpass_hz", self.highpass_hz, sampling_rate)?;
        below_nyquist("lowpass_hz", self.lowpass_hz, sampling_rate)
    }
}

/// Global processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Configuration name/profile
    pub name: String,
    /// Conditioning stage
    pub conditioning: ConditioningConfig,
    /// Butterworth order of each band-pass in the decomposer
    pub band_filter_order: usize,
    /// Bands to decompose into, in declaration (tie-break) order
    #[serde(default = "FrequencyBand::canonical")]
    pub bands: Vec<FrequencyBand>,
    /// Power spectrum estimation
    #[serde(default)]
    pub spectrum: WelchConfig,
}

/// Preset configurations for common scenarios
impl ProcessingConfig {
    /// 60 Hz powerline (Americas, parts of Asia)
    pub fn north_america() -> Self {
        ProcessingConfig {
            name: "North America (60 Hz)".to_string(),
            conditioning: ConditioningConfig::default(),
            band_filter_order: 4,
            bands: FrequencyBand::canonical(),
            spectrum: WelchConfig::default(),
        }
    }

    /// 50 Hz powerline (Europe, Africa, most of Asia)
    pub fn europe() -> Self {
        ProcessingConfig {
            name: "Europe (50 Hz)".to_string(),
            conditioning: ConditioningConfig::default().with_powerline(50.0),
            ..Self::north_america()
        }
    }

    /// Validate entire configuration
    pub fn validate(&self) -> EegResult<()> {
        if self.name.trim().is_empty() {
            return Err(EegError::ConfigurationError {
                message: "Configuration name cannot be empty".to_string(),
            });
        }

        self.conditioning.validate()?;
        order("band_filter_order", self.band_filter_order)?;

        if self.bands.is_empty() {
            return Err(EegError::ConfigurationError {
                message: "At least one frequency band is required".to_string(),
            });
        }
        for band in &self.bands {
            band.validate()?;
        }

        self.spectrum.validate()
    }

    /// Validate against the sampling rate of the recording to be processed
    pub fn validate_for(&self, sampling_rate: f64) -> EegResult<()> {
        self.validate()?;
        self.conditioning.validate_for(sampling_rate)?;
        for band in &self.bands {
            band.validate_for(sampling_rate)?;
        }
        self.spectrum.validate_for(sampling_rate)
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> EegResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EegError::ConfigurationError {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> EegResult<Self> {
        serde_json::from_str(json).map_err(|e| EegError::ConfigurationError {
            message: format!("Failed to deserialize configuration: {}", e),
        })
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::north_america()
    }
}

fn positive(parameter: &'static str, value: f64) -> EegResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EegError::invalid_parameter(parameter, value, "must be positive and finite"));
    }
    Ok(())
}

fn below_nyquist(parameter: &'static str, value: f64, sampling_rate: f64) -> EegResult<()> {
    let nyquist = sampling_rate / 2.0;
    if value >= nyquist {
        return Err(EegError::invalid_parameter(
            parameter,
            value,
            format!("must be below the Nyquist frequency ({} Hz)", nyquist),
        ));
    }
    Ok(())
}

fn order(parameter: &'static str, value: usize) -> EegResult<()> {
    if value == 0 || value > MAX_FILTER_ORDER {
        return Err(EegError::invalid_parameter(
            parameter,
            value as f64,
            format!("must be between 1 and {}", MAX_FILTER_ORDER),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        let na = ProcessingConfig::north_america();
        assert_eq!(na.conditioning.notch_hz, Some(60.0));
        assert!(na.validate().is_ok());
        assert!(na.validate_for(160.0).is_ok());

        let eu = ProcessingConfig::europe();
        assert_eq!(eu.conditioning.notch_hz, Some(50.0));
        assert_eq!(eu.bands, FrequencyBand::canonical());
        assert!(eu.validate_for(160.0).is_ok());
    }

    #[test]
    fn test_conditioning_defaults() {
        let config = ConditioningConfig::default();
        assert_eq!(config.highpass_hz, 1.0);
        assert_eq!(config.lowpass_hz, 40.0);
        assert_eq!(config.notch_q, 30.0);
        assert_eq!(config.filter_order, 4);
        assert!(!config.notch_harmonics);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProcessingConfig::default();

        config.conditioning.highpass_hz = 50.0;
        assert!(config.validate().is_err());

        config.conditioning.highpass_hz = 1.0;
        config.band_filter_order = 0;
        assert!(config.validate().is_err());

        config.band_filter_order = 4;
        config.bands.clear();
        assert!(matches!(config.validate(), Err(EegError::ConfigurationError { .. })));

        config.bands = FrequencyBand::canonical();
        config.name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_for_low_sampling_rate() {
        let config = ProcessingConfig::default();
        // 40 Hz low-pass is not representable at 64 Hz
        let err = config.validate_for(64.0).unwrap_err();
        assert!(matches!(err, EegError::InvalidFilterParameter { parameter: "lowpass_hz", .. }));

        // Notch above Nyquist is allowed: it becomes a no-op
        assert!(config.validate_for(100.0).is_ok());
    }

    #[test]
    fn test_json_serialization() {
        let config = ProcessingConfig::europe();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"notch_hz\": 50.0"));

        let back = ProcessingConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_json_defaults_for_optional_sections() {
        let json = r#"{
            "name": "minimal",
            "conditioning": {
                "highpass_hz": 0.5,
                "lowpass_hz": 30.0,
                "notch_hz": null,
                "notch_q": 30.0,
                "notch_harmonics": false,
                "filter_order": 2
            },
            "band_filter_order": 4
        }"#;
        let config = ProcessingConfig::from_json(json).unwrap();
        assert_eq!(config.bands.len(), 4);
        assert_eq!(config.spectrum, WelchConfig::default());
        assert!(config.conditioning.notch_hz.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_json_is_configuration_error() {
        let err = ProcessingConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EegError::ConfigurationError { .. }));
    }
}
