//! Conditioning: drift, high-frequency noise and powerline removal.
//!
//! Each step returns a new signal and leaves its input untouched, so callers
//! can keep the raw recording for before/after comparisons.

use crate::config::ConditioningConfig;
use crate::filters::{ButterworthFilter, FilterConfig, NotchFilter};
use crate::pipeline::Pipeline;
use crate::processor::SignalProcessor;
use eeg_core::{EegResult, EegSignal};
use tracing::info;

/// Default high-pass cutoff (Hz)
pub const DEFAULT_HIGHPASS_HZ: f64 = 1.0;
/// Default low-pass cutoff (Hz)
pub const DEFAULT_LOWPASS_HZ: f64 = 40.0;
/// Default powerline frequency (Hz)
pub const DEFAULT_NOTCH_HZ: f64 = 60.0;
/// Default notch quality factor
pub const DEFAULT_NOTCH_Q: f64 = 30.0;
/// Default Butterworth order of the conditioning filters
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Attenuate content below `cutoff_hz`
pub fn apply_highpass(signal: &EegSignal, cutoff_hz: f64) -> EegResult<EegSignal> {
    ButterworthFilter::new(FilterConfig::highpass(cutoff_hz, DEFAULT_FILTER_ORDER))?.process(signal)
}

/// Attenuate content above `cutoff_hz`
pub fn apply_lowpass(signal: &EegSignal, cutoff_hz: f64) -> EegResult<EegSignal> {
    ButterworthFilter::new(FilterConfig::lowpass(cutoff_hz, DEFAULT_FILTER_ORDER))?.process(signal)
}

/// Suppress a narrow band around `freq_hz`.
///
/// A frequency at or above Nyquist cannot be present in the samples; the
/// result is then an unfiltered copy.
pub fn apply_notch(signal: &EegSignal, freq_hz: f64) -> EegResult<EegSignal> {
    NotchFilter::new(freq_hz, DEFAULT_NOTCH_Q)?.process(signal)
}

/// High-pass, low-pass and notch with the default parameters
pub fn condition(signal: &EegSignal) -> EegResult<EegSignal> {
    condition_with(signal, &ConditioningConfig::default())
}

/// High-pass, low-pass and notch, in that order
pub fn condition_with(signal: &EegSignal, config: &ConditioningConfig) -> EegResult<EegSignal> {
    signal.ensure_not_empty()?;

    let pipeline = Pipeline::conditioning(config)?;
    let result = pipeline.process(signal)?;

    info!(
        channels = result.output_signal.channel_count(),
        samples = result.output_signal.samples_per_channel(),
        time_us = result.total_time_us,
        passband = %result.output_signal.metadata,
        "signal conditioned"
    );

    Ok(result.output_signal)
}
