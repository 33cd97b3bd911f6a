//! Core signal processor trait and types

use eeg_core::{EegResult, EegSignal};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Core trait for all signal processors.
///
/// Processors hold only their parameters: every call designs what it needs
/// from the input signal and returns a new signal, so the same processor can
/// be applied to any number of signals and always gives the same result.
pub trait SignalProcessor: Send + Sync {
    /// Process a signal and return the processed result
    fn process(&self, input: &EegSignal) -> EegResult<EegSignal>;

    /// Get processor name/identifier
    fn name(&self) -> &str;

    /// One-line description of the configured operation, for logs and history
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Check if processor can handle the given signal
    fn can_process(&self, signal: &EegSignal) -> bool {
        !signal.is_empty()
    }
}

/// Performance and energy bookkeeping for one processing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    /// Processor that produced these metrics
    pub processor: String,
    /// Actual processing time in microseconds
    pub processing_time_us: u64,
    /// Mean squared amplitude before the step
    pub input_mean_square: f64,
    /// Mean squared amplitude after the step
    pub output_mean_square: f64,
}

impl ProcessingMetrics {
    /// Start timing a processing step
    pub fn start_timing(processor: &str, input: &EegSignal) -> ProcessingTimer {
        ProcessingTimer {
            processor: processor.to_string(),
            start: Instant::now(),
            input_mean_square: input.mean_square(),
        }
    }

    /// Fraction of the input energy kept by the step (1.0 for a silent input)
    pub fn energy_ratio(&self) -> f64 {
        if self.input_mean_square > 0.0 {
            self.output_mean_square / self.input_mean_square
        } else {
            1.0
        }
    }
}

/// Timer handle returned by [`ProcessingMetrics::start_timing`]
pub struct ProcessingTimer {
    processor: String,
    start: Instant,
    input_mean_square: f64,
}

impl ProcessingTimer {
    pub fn finish(self, output: &EegSignal) -> ProcessingMetrics {
        ProcessingMetrics {
            processor: self.processor,
            processing_time_us: self.start.elapsed().as_micros() as u64,
            input_mean_square: self.input_mean_square,
            output_mean_square: output.mean_square(),
        }
    }
}
