//! Ordered chains of signal processors, including the conditioning chain

use crate::config::ConditioningConfig;
use crate::filters::{ButterworthFilter, FilterConfig, NotchFilter};
use crate::processor::{ProcessingMetrics, SignalProcessor};
use eeg_core::{EegResult, EegSignal};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

/// Named sequence of processors applied one after another
pub struct Pipeline {
    processors: Vec<Box<dyn SignalProcessor>>,
    name: String,
}

/// Incremental construction of a [`Pipeline`]
pub struct PipelineBuilder {
    processors: Vec<Box<dyn SignalProcessor>>,
    name: String,
}

/// Pipeline execution result with per-step metrics
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub output_signal: EegSignal,
    pub processing_metrics: Vec<ProcessingMetrics>,
    pub total_time_us: u64,
}

/// Pipeline performance summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelinePerformance {
    pub total_time_us: u64,
    pub slowest_step: Option<String>,
    pub processor_count: usize,
}

impl Pipeline {
    /// Pipeline with no steps; the input passes through unchanged
    pub fn new(name: &str) -> Self {
        Pipeline {
            processors: Vec::new(),
            name: name.to_string(),
        }
    }

    /// Append a step
    pub fn add_processor(&mut self, processor: Box<dyn SignalProcessor>) {
        self.processors.push(processor);
    }

    /// High-pass, then low-pass, then notch (when configured)
    pub fn conditioning(config: &ConditioningConfig) -> EegResult<Self> {
        config.validate()?;

        let mut builder = PipelineBuilder::new("Conditioning");
        builder
            .add_highpass(config.highpass_hz, config.filter_order)?
            .add_lowpass(config.lowpass_hz, config.filter_order)?;

        if let Some(notch_hz) = config.notch_hz {
            builder.add_notch(notch_hz, config.notch_q, config.notch_harmonics)?;
        }

        Ok(builder.build())
    }

    /// Process signal through the entire pipeline.
    ///
    /// Each step receives the previous step's output; the first failure
    /// aborts the run and no partial result is returned.
    pub fn process(&self, input: &EegSignal) -> EegResult<PipelineResult> {
        let start_time = Instant::now();
        let mut current_signal = input.clone();
        let mut all_metrics = Vec::with_capacity(self.processors.len());

        for (step, processor) in self.processors.iter().enumerate() {
            let timer = ProcessingMetrics::start_timing(processor.name(), &current_signal);

            match processor.process(&current_signal) {
                Ok(processed_signal) => {
                    let metrics = timer.finish(&processed_signal);
                    info!(
                        pipeline = %self.name,
                        step = step + 1,
                        processor = %processor.describe(),
                        time_us = metrics.processing_time_us,
                        energy_ratio = metrics.energy_ratio(),
                        "processing step complete"
                    );
                    all_metrics.push(metrics);
                    current_signal = processed_signal;
                }
                Err(e) => {
                    error!(
                        pipeline = %self.name,
                        step = step + 1,
                        processor = %processor.name(),
                        error = %e,
                        "processing step failed"
                    );
                    return Err(e);
                }
            }
        }

        Ok(PipelineResult {
            output_signal: current_signal,
            processing_metrics: all_metrics,
            total_time_us: start_time.elapsed().as_micros() as u64,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// First step whose name matches
    pub fn get_processor(&self, name: &str) -> Option<&dyn SignalProcessor> {
        self.processors
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Step names in execution order
    pub fn processor_names(&self) -> Vec<String> {
        self.processors.iter().map(|p| p.name().to_string()).collect()
    }

    /// One description per step, in execution order
    pub fn describe_steps(&self) -> Vec<String> {
        self.processors.iter().map(|p| p.describe()).collect()
    }
}

impl PipelineResult {
    pub fn performance(&self) -> PipelinePerformance {
        PipelinePerformance {
            total_time_us: self.total_time_us,
            slowest_step: self
                .processing_metrics
                .iter()
                .max_by_key(|m| m.processing_time_us)
                .map(|m| m.processor.clone()),
            processor_count: self.processing_metrics.len(),
        }
    }
}

impl SignalProcessor for Pipeline {
    fn process(&self, input: &EegSignal) -> EegResult<EegSignal> {
        let result = Pipeline::process(self, input)?;
        Ok(result.output_signal)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.name, self.describe_steps().join(" -> "))
    }
}

impl PipelineBuilder {
    /// Empty builder for a pipeline called `name`
    pub fn new(name: &str) -> Self {
        PipelineBuilder {
            processors: Vec::new(),
            name: name.to_string(),
        }
    }

    /// Append a custom step
    pub fn add_processor(&mut self, processor: Box<dyn SignalProcessor>) -> &mut Self {
        self.processors.push(processor);
        self
    }

    /// Append a zero-phase Butterworth high-pass
    pub fn add_highpass(&mut self, cutoff: f64, order: usize) -> EegResult<&mut Self> {
        let filter = ButterworthFilter::new(FilterConfig::highpass(cutoff, order))?;
        self.processors.push(Box::new(filter));
        Ok(self)
    }

    /// Append a zero-phase Butterworth low-pass
    pub fn add_lowpass(&mut self, cutoff: f64, order: usize) -> EegResult<&mut Self> {
        let filter = ButterworthFilter::new(FilterConfig::lowpass(cutoff, order))?;
        self.processors.push(Box::new(filter));
        Ok(self)
    }

    /// Append a zero-phase Butterworth band-pass
    pub fn add_bandpass(&mut self, low: f64, high: f64, order: usize) -> EegResult<&mut Self> {
        let filter = ButterworthFilter::new(FilterConfig::bandpass(low, high, order))?;
        self.processors.push(Box::new(filter));
        Ok(self)
    }

    /// Append a powerline notch, optionally with its harmonics
    pub fn add_notch(&mut self, freq: f64, q: f64, harmonics: bool) -> EegResult<&mut Self> {
        let filter = NotchFilter::new(freq, q)?.with_harmonics(harmonics);
        self.processors.push(Box::new(filter));
        Ok(self)
    }

    /// Finish building; steps keep their insertion order
    pub fn build(self) -> Pipeline {
        let mut pipeline = Pipeline::new(&self.name);
        for processor in self.processors {
            pipeline.add_processor(processor);
        }
        pipeline
    }
}
