//! One-shot analysis of a recording: load, condition, decompose, estimate spectra

use eeg_core::{EegResult, EegSignal, SignalSource, SourceConfig};
use eeg_processing::{
    condition_with, welch_psd, BandDecomposer, BandDecomposition, ChannelBandPowers,
    PowerSpectrum, ProcessingConfig, RecordingSummary,
};
use std::time::Instant;
use tracing::{info, instrument};

/// Everything the report prints for one recording
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Recording as delivered by the source
    pub raw: EegSignal,
    /// Output of the conditioning pipeline
    pub conditioned: EegSignal,
    pub decomposition: BandDecomposition,
    pub summary: RecordingSummary,
    pub channel_powers: Vec<ChannelBandPowers>,
    pub raw_spectrum: PowerSpectrum,
    pub conditioned_spectrum: PowerSpectrum,
    /// Wall time spent conditioning and decomposing
    pub processing_time_us: u64,
}

impl AnalysisReport {
    /// Name of the dominant band, if any band was analysed
    pub fn dominant_band(&self) -> Option<&str> {
        self.summary.dominant_band.as_deref()
    }
}

/// Load the recording named by `source_config` and analyse it with `config`
#[instrument(skip_all, fields(source = source.name(), subject = source_config.subject_id, run = source_config.run_id))]
pub fn run_analysis(
    source: &mut dyn SignalSource,
    source_config: &SourceConfig,
    config: &ProcessingConfig,
) -> EegResult<AnalysisReport> {
    let raw = source.load(source_config)?;
    config.validate_for(raw.sampling_rate())?;

    let start = Instant::now();
    let conditioned = condition_with(&raw, &config.conditioning)?;
    let decomposition = BandDecomposer::new(config.band_filter_order)?.decompose(&conditioned, &config.bands)?;
    let processing_time_us = start.elapsed().as_micros() as u64;

    let raw_spectrum = welch_psd(&raw, &config.spectrum)?;
    let conditioned_spectrum = welch_psd(&conditioned, &config.spectrum)?;

    let summary = RecordingSummary::new(&conditioned, &decomposition);
    let channel_powers = decomposition.channel_powers();

    info!(
        profile = %config.name,
        dominant = summary.dominant_band.as_deref().unwrap_or("-"),
        processing_time_us,
        "analysis complete"
    );

    Ok(AnalysisReport {
        raw,
        conditioned,
        decomposition,
        summary,
        channel_powers,
        raw_spectrum,
        conditioned_spectrum,
        processing_time_us,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::EegError;
    use eeg_simulation::{EegSimulator, RhythmPattern, SimulatorConfig};

    fn simulator(pattern: RhythmPattern) -> EegSimulator {
        EegSimulator::new(SimulatorConfig {
            duration_secs: 20.0,
            channel_names: vec!["C3".into(), "Cz".into(), "C4".into(), "O1".into(), "O2".into()],
            pattern,
            ..SimulatorConfig::default()
        })
        .unwrap()
    }

    struct MissingRecording;

    impl SignalSource for MissingRecording {
        fn load(&mut self, config: &SourceConfig) -> EegResult<EegSignal> {
            Err(EegError::SourceError {
                message: format!("no recording at {}", config.recording_path().display()),
            })
        }

        fn name(&self) -> &str {
            "missing"
        }
    }

    #[test]
    fn test_rest_recording_is_alpha_dominated() {
        let mut source = simulator(RhythmPattern::EyesClosedRest);
        let report = run_analysis(&mut source, &SourceConfig::default(), &ProcessingConfig::default()).unwrap();

        assert_eq!(report.dominant_band(), Some("Alpha"));
        assert_eq!(report.decomposition.len(), 4);
        assert_eq!(report.channel_powers.len(), 5);
        assert_eq!(report.conditioned.samples_per_channel(), report.raw.samples_per_channel());
        assert_eq!(report.conditioned.metadata.history.len(), 3);
        assert_eq!(report.conditioned_spectrum.peak_frequency(), Some(10.0));
    }

    #[test]
    fn test_identifiers_reach_the_recording() {
        let mut source = simulator(RhythmPattern::DeepSleep);
        let report = run_analysis(&mut source, &SourceConfig::new(12, 3, "data"), &ProcessingConfig::default()).unwrap();

        assert_eq!(report.raw.metadata.subject_id, Some(12));
        assert_eq!(report.raw.metadata.run_id, Some(3));
        assert_eq!(report.dominant_band(), Some("Delta"));
    }

    #[test]
    fn test_config_checked_against_sampling_rate() {
        let mut config = ProcessingConfig::default();
        config.conditioning.lowpass_hz = 90.0;

        let mut source = simulator(RhythmPattern::EyesClosedRest);
        let err = run_analysis(&mut source, &SourceConfig::default(), &config).unwrap_err();
        assert!(matches!(err, EegError::InvalidFilterParameter { parameter: "lowpass_hz", .. }));
    }

    #[test]
    fn test_source_failure_is_propagated() {
        let err = run_analysis(&mut MissingRecording, &SourceConfig::default(), &ProcessingConfig::default())
            .unwrap_err();
        assert!(matches!(err, EegError::SourceError { .. }));
    }
}
