//! Synthetic EEG recordings with known rhythm content

use crate::rhythms::RhythmPattern;
use eeg_core::{EegError, EegResult, EegSignal, RecordingMetadata, SignalSource, SourceConfig};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

/// Channel labels used when none are configured: the 10-20 system
pub const DEFAULT_MONTAGE: [&str; 19] = [
    "Fp1", "Fp2", "F7", "F3", "Fz", "F4", "F8", "T7", "C3", "Cz", "C4", "T8", "P7", "P3", "Pz",
    "P4", "P8", "O1", "O2",
];

/// Noise configuration for realistic EEG simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gaussian noise standard deviation (µV, 0.0 = no noise)
    pub gaussian_std_uv: f64,
    /// Baseline wander amplitude (µV)
    pub baseline_wander_uv: f64,
    /// Baseline wander frequency (Hz)
    pub baseline_wander_hz: f64,
    /// Largest per-channel electrode offset (µV)
    pub dc_offset_uv: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gaussian_std_uv: 2.0,
            baseline_wander_uv: 15.0,
            baseline_wander_hz: 0.1,
            dc_offset_uv: 25.0,
        }
    }
}

impl NoiseConfig {
    /// No noise, drift or offset at all
    pub fn silent() -> Self {
        Self {
            gaussian_std_uv: 0.0,
            baseline_wander_uv: 0.0,
            baseline_wander_hz: 0.1,
            dc_offset_uv: 0.0,
        }
    }
}

/// Configuration for EEG simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Recording length in seconds
    pub duration_secs: f64,
    /// Channel labels, one simulated channel each
    pub channel_names: Vec<String>,
    /// Rhythm mixture to generate
    pub pattern: RhythmPattern,
    /// Noise configuration
    pub noise: NoiseConfig,
    /// Power line interference (50/60Hz)
    pub powerline_hz: Option<f64>,
    /// Power line interference amplitude (µV)
    pub powerline_amplitude_uv: f64,
    /// Base seed; combined with subject and run for each recording
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 160.0,
            duration_secs: 60.0,
            channel_names: DEFAULT_MONTAGE.iter().map(|s| s.to_string()).collect(),
            pattern: RhythmPattern::EyesClosedRest,
            noise: NoiseConfig::default(),
            powerline_hz: Some(60.0),
            powerline_amplitude_uv: 5.0,
            seed: 42,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> EegResult<()> {
        RecordingMetadata::validate_sampling_rate(self.sampling_rate)?;

        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(EegError::ConfigurationError {
                message: format!("Duration must be positive, got {} s", self.duration_secs),
            });
        }
        if self.channel_names.is_empty() {
            return Err(EegError::ConfigurationError {
                message: "At least one channel is required".to_string(),
            });
        }
        if let Some(freq) = self.powerline_hz {
            if !freq.is_finite() || freq <= 0.0 {
                return Err(EegError::ConfigurationError {
                    message: format!("Powerline frequency must be positive, got {} Hz", freq),
                });
            }
        }
        non_negative("noise.gaussian_std_uv", self.noise.gaussian_std_uv)?;
        non_negative("noise.baseline_wander_uv", self.noise.baseline_wander_uv)?;
        non_negative("noise.baseline_wander_hz", self.noise.baseline_wander_hz)?;
        non_negative("noise.dc_offset_uv", self.noise.dc_offset_uv)?;
        non_negative("powerline_amplitude_uv", self.powerline_amplitude_uv)?;

        if self.pattern.components().iter().any(|c| !c.frequency_hz.is_finite() || c.frequency_hz < 0.0) {
            return Err(EegError::ConfigurationError {
                message: "Rhythm frequencies must be non-negative and finite".to_string(),
            });
        }
        Ok(())
    }

    /// Samples per channel
    pub fn sample_count(&self) -> usize {
        (self.duration_secs * self.sampling_rate).round() as usize
    }
}

fn non_negative(field: &str, value: f64) -> EegResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EegError::ConfigurationError {
            message: format!("{} must be finite and non-negative, got {}", field, value),
        });
    }
    Ok(())
}

/// Deterministic seed for one (seed, subject, run) triple
pub fn recording_seed(seed: u64, subject_id: u32, run_id: u32) -> u64 {
    // splitmix64 finaliser over the packed identifiers
    let mut z = seed ^ ((subject_id as u64) << 32 | run_id as u64);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// EEG signal simulator
pub struct EegSimulator {
    config: SimulatorConfig,
    noise: Normal<f64>,
}

impl EegSimulator {
    /// Create new EEG simulator with configuration
    pub fn new(config: SimulatorConfig) -> EegResult<Self> {
        config.validate()?;

        let noise = Normal::new(0.0, config.noise.gaussian_std_uv).map_err(|e| EegError::ConfigurationError {
            message: format!("Failed to create normal distribution: {}", e),
        })?;

        Ok(EegSimulator { config, noise })
    }

    /// Generate the recording for one subject and run
    pub fn generate(&self, subject_id: u32, run_id: u32) -> EegResult<EegSignal> {
        let seed = recording_seed(self.config.seed, subject_id, run_id);
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let fs = self.config.sampling_rate;
        let samples = self.config.sample_count();
        let components = self.config.pattern.components();
        let noise_config = &self.config.noise;

        debug!(
            subject_id,
            run_id,
            seed,
            samples,
            channels = self.config.channel_names.len(),
            "generating synthetic EEG"
        );

        let data = (0..self.config.channel_names.len())
            .map(|channel| {
                let offset = noise_config.dc_offset_uv * rng.gen_range(-1.0..=1.0);
                let wander_phase = rng.gen_range(0.0..2.0 * PI);
                let gain = rng.gen_range(0.85..1.15);

                (0..samples)
                    .map(|i| {
                        let t = i as f64 / fs;
                        let mut value: f64 = components.iter().map(|c| c.value_at(t, channel)).sum::<f64>() * gain;

                        value += offset;
                        value += noise_config.baseline_wander_uv
                            * (2.0 * PI * noise_config.baseline_wander_hz * t + wander_phase).sin();
                        value += self.noise.sample(&mut rng);

                        if let Some(freq) = self.config.powerline_hz {
                            value += self.config.powerline_amplitude_uv * (2.0 * PI * freq * t).sin();
                        }
                        value
                    })
                    .collect()
            })
            .collect();

        let metadata = RecordingMetadata::new(fs, self.config.channel_names.clone())?
            .with_identifiers(subject_id, run_id);
        EegSignal::new(data, metadata)
    }

    /// Get current configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

impl SignalSource for EegSimulator {
    fn load(&mut self, config: &SourceConfig) -> EegResult<EegSignal> {
        let signal = self.generate(config.subject_id, config.run_id)?;
        info!(
            source = self.name(),
            path = %config.recording_path().display(),
            pattern = %self.config.pattern,
            "loaded recording: {}",
            signal.metadata
        );
        Ok(signal)
    }

    fn name(&self) -> &str {
        "EEG simulator"
    }
}
