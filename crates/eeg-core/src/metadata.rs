//! Recording metadata carried alongside every EEG signal

use serde::{Deserialize, Serialize};
use crate::error::{EegError, EegResult};

/// Metadata describing a (possibly processed) EEG recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Channel labels, one per row of the signal
    pub channel_names: Vec<String>,
    /// Subject the recording belongs to, if known
    pub subject_id: Option<u32>,
    /// Run/session number within the subject, if known
    pub run_id: Option<u32>,
    /// Effective high-pass edge after filtering (Hz)
    pub highpass_hz: Option<f64>,
    /// Effective low-pass edge after filtering (Hz)
    pub lowpass_hz: Option<f64>,
    /// Processing steps applied so far, oldest first
    pub history: Vec<String>,
}

impl RecordingMetadata {
    /// Create metadata for an unprocessed recording
    pub fn new(sampling_rate: f64, channel_names: Vec<String>) -> EegResult<Self> {
        Self::validate_sampling_rate(sampling_rate)?;

        Ok(RecordingMetadata {
            sampling_rate,
            channel_names,
            subject_id: None,
            run_id: None,
            highpass_hz: None,
            lowpass_hz: None,
            history: Vec::new(),
        })
    }

    /// Attach subject and run identifiers
    pub fn with_identifiers(mut self, subject_id: u32, run_id: u32) -> Self {
        self.subject_id = Some(subject_id);
        self.run_id = Some(run_id);
        self
    }

    /// Sampling rate must be a positive, finite number of Hz
    pub fn validate_sampling_rate(rate: f64) -> EegResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            Err(EegError::InvalidSignalData {
                reason: format!("Sampling rate must be positive and finite, got {}", rate),
            })
        } else {
            Ok(())
        }
    }

    /// Half the sampling rate
    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }

    pub fn channel_count(&self) -> usize {
        self.channel_names.len()
    }

    /// Index of the channel with the given label
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channel_names.iter().position(|n| n == name)
    }

    /// Record a high-pass step; the effective edge only ever rises
    pub fn record_highpass(&mut self, cutoff_hz: f64, description: String) {
        self.highpass_hz = Some(self.highpass_hz.map_or(cutoff_hz, |hp| hp.max(cutoff_hz)));
        self.history.push(description);
    }

    /// Record a low-pass step; the effective edge only ever falls
    pub fn record_lowpass(&mut self, cutoff_hz: f64, description: String) {
        self.lowpass_hz = Some(self.lowpass_hz.map_or(cutoff_hz, |lp| lp.min(cutoff_hz)));
        self.history.push(description);
    }

    /// Record a band-pass step as a single history entry
    pub fn record_bandpass(&mut self, low_hz: f64, high_hz: f64, description: String) {
        self.highpass_hz = Some(self.highpass_hz.map_or(low_hz, |hp| hp.max(low_hz)));
        self.lowpass_hz = Some(self.lowpass_hz.map_or(high_hz, |lp| lp.min(high_hz)));
        self.history.push(description);
    }

    /// Record a step that does not move the pass-band edges
    pub fn record_step(&mut self, description: String) {
        self.history.push(description);
    }
}

impl std::fmt::Display for RecordingMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} channels @ {} Hz", self.channel_count(), self.sampling_rate)?;
        if let (Some(subject), Some(run)) = (self.subject_id, self.run_id) {
            write!(f, " (subject {:03}, run {:02})", subject, run)?;
        }
        match (self.highpass_hz, self.lowpass_hz) {
            (None, None) => Ok(()),
            (hp, lp) => write!(
                f,
                ", passband {}-{} Hz",
                hp.map_or("0".to_string(), |v| format!("{:.2}", v)),
                lp.map_or(format!("{:.2}", self.nyquist()), |v| format!("{:.2}", v)),
            ),
        }
    }
}
