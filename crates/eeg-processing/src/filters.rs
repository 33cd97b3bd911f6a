//! Digital filters for EEG conditioning
//!
//! Butterworth low/high/band-pass and powerline notch filters, built from
//! second-order sections and run forward-backward so the output has no phase
//! shift relative to the input.

use crate::processor::SignalProcessor;
use eeg_core::{EegError, EegResult, EegSignal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Highest Butterworth order accepted by the filters
pub const MAX_FILTER_ORDER: usize = 10;

/// Relative impulse-response level treated as "rung out" when sizing the edge padding
pub const RINGING_TOLERANCE: f64 = 1e-3;

/// Filter types supported by the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    /// Butterworth lowpass filter
    ButterworthLowpass,
    /// Butterworth highpass filter
    ButterworthHighpass,
    /// Butterworth bandpass filter (highpass cascaded with lowpass)
    ButterworthBandpass,
    /// Notch filter for powerline interference
    Notch,
}

/// Filter configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Filter type
    pub filter_type: FilterType,
    /// Butterworth order of each pass
    pub order: usize,
    /// Cutoff frequency for lowpass/highpass (Hz)
    pub cutoff_freq: Option<f64>,
    /// Low cutoff for bandpass (Hz)
    pub low_cutoff: Option<f64>,
    /// High cutoff for bandpass (Hz)
    pub high_cutoff: Option<f64>,
    /// Notch frequency (Hz) - typically 50 or 60
    pub notch_freq: Option<f64>,
    /// Notch quality factor
    pub notch_q: Option<f64>,
    /// Also notch every harmonic of `notch_freq` below Nyquist
    pub notch_harmonics: bool,
}

impl FilterConfig {
    fn empty(filter_type: FilterType, order: usize) -> Self {
        Self {
            filter_type,
            order,
            cutoff_freq: None,
            low_cutoff: None,
            high_cutoff: None,
            notch_freq: None,
            notch_q: None,
            notch_harmonics: false,
        }
    }

    /// Create lowpass filter configuration
    pub fn lowpass(cutoff_freq: f64, order: usize) -> Self {
        Self {
            cutoff_freq: Some(cutoff_freq),
            ..Self::empty(FilterType::ButterworthLowpass, order)
        }
    }

    /// Create highpass filter configuration
    pub fn highpass(cutoff_freq: f64, order: usize) -> Self {
        Self {
            cutoff_freq: Some(cutoff_freq),
            ..Self::empty(FilterType::ButterworthHighpass, order)
        }
    }

    /// Create bandpass filter configuration
    pub fn bandpass(low_cutoff: f64, high_cutoff: f64, order: usize) -> Self {
        Self {
            low_cutoff: Some(low_cutoff),
            high_cutoff: Some(high_cutoff),
            ..Self::empty(FilterType::ButterworthBandpass, order)
        }
    }

    /// Create notch filter configuration
    pub fn notch(freq: f64, q: f64) -> Self {
        Self {
            notch_freq: Some(freq),
            notch_q: Some(q),
            ..Self::empty(FilterType::Notch, 2)
        }
    }

    /// Enable or disable notching of harmonics
    pub fn with_harmonics(mut self, enabled: bool) -> Self {
        self.notch_harmonics = enabled;
        self
    }
}

/// Single second-order section.
///
/// `y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]`; first-order
/// sections leave `b2` and `a2` at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadSection {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadSection {
    /// Butterworth lowpass pole pair with pre-warped gain `k` and quality `q`
    fn lowpass(k: f64, q: f64) -> Self {
        let k2 = k * k;
        let norm = 1.0 / (1.0 + k / q + k2);
        let b0 = k2 * norm;
        Self {
            b0,
            b1: 2.0 * b0,
            b2: b0,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - k / q + k2) * norm,
        }
    }

    /// Butterworth highpass pole pair with pre-warped gain `k` and quality `q`
    fn highpass(k: f64, q: f64) -> Self {
        let k2 = k * k;
        let norm = 1.0 / (1.0 + k / q + k2);
        Self {
            b0: norm,
            b1: -2.0 * norm,
            b2: norm,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - k / q + k2) * norm,
        }
    }

    /// Real pole of an odd-order lowpass
    fn first_order_lowpass(k: f64) -> Self {
        let norm = 1.0 / (1.0 + k);
        Self {
            b0: k * norm,
            b1: k * norm,
            b2: 0.0,
            a1: (k - 1.0) * norm,
            a2: 0.0,
        }
    }

    /// Real pole of an odd-order highpass
    fn first_order_highpass(k: f64) -> Self {
        let norm = 1.0 / (1.0 + k);
        Self {
            b0: norm,
            b1: -norm,
            b2: 0.0,
            a1: (k - 1.0) * norm,
            a2: 0.0,
        }
    }

    /// Second-order notch at `freq` Hz with quality factor `q`
    fn notch(freq: f64, q: f64, fs: f64) -> Self {
        let omega = 2.0 * PI * freq / fs;
        let alpha = omega.sin() / (2.0 * q);
        let cos_omega = omega.cos();

        let a0 = 1.0 + alpha;
        Self {
            b0: 1.0 / a0,
            b1: -2.0 * cos_omega / a0,
            b2: 1.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Gain at 0 Hz
    pub fn dc_gain(&self) -> f64 {
        let denominator = 1.0 + self.a1 + self.a2;
        if denominator.abs() < f64::EPSILON {
            0.0
        } else {
            (self.b0 + self.b1 + self.b2) / denominator
        }
    }

    /// Filter `data` in place, starting from the steady state for `data[0]`
    fn filter_in_place(&self, data: &mut [f64]) {
        let Some(&first) = data.first() else {
            return;
        };

        let (mut x1, mut x2) = (first, first);
        let steady = self.dc_gain() * first;
        let (mut y1, mut y2) = (steady, steady);

        for sample in data.iter_mut() {
            let input = *sample;
            let output = self.b0 * input + self.b1 * x1 + self.b2 * x2
                - self.a1 * y1 - self.a2 * y2;

            x2 = x1;
            x1 = input;
            y2 = y1;
            y1 = output;

            *sample = output;
        }
    }
}

/// Cascade of sections applied in series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionCascade {
    sections: Vec<BiquadSection>,
}

impl SectionCascade {
    pub fn new(sections: Vec<BiquadSection>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[BiquadSection] {
        &self.sections
    }

    /// Append another cascade after this one
    pub fn chain(mut self, other: SectionCascade) -> Self {
        self.sections.extend(other.sections);
        self
    }

    /// Single forward pass, no padding
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut output = input.to_vec();
        for section in &self.sections {
            section.filter_in_place(&mut output);
        }
        output
    }

    /// Number of samples until the impulse response stays below
    /// `RINGING_TOLERANCE` of its peak, looking at most `limit` samples ahead
    pub fn ringing_samples(&self, limit: usize) -> usize {
        if limit == 0 || self.sections.is_empty() {
            return 0;
        }

        // Leading zero so every section starts from rest
        let mut impulse = vec![0.0; limit + 2];
        impulse[1] = 1.0;
        let response = &self.filter(&impulse)[1..];

        let peak = response.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        response
            .iter()
            .rposition(|v| v.abs() > RINGING_TOLERANCE * peak)
            .map_or(0, |last| last + 1)
    }

    /// Zero-phase filtering: forward pass, then backward pass.
    ///
    /// Both ends are extended by mirror reflection, long enough for the
    /// filter's ringing to die out (never longer than the signal itself), and
    /// the extension is dropped afterwards so the output has the input's length.
    pub fn filtfilt(&self, input: &[f64]) -> Vec<f64> {
        let n = input.len();
        if n == 0 || self.sections.is_empty() {
            return input.to_vec();
        }

        let min_pad = 3 * (2 * self.sections.len() + 1);
        let pad = min_pad.max(self.ringing_samples(n - 1)).min(n - 1);

        let mut extended = Vec::with_capacity(n + 2 * pad);
        extended.extend((1..=pad).rev().map(|i| input[i]));
        extended.extend_from_slice(input);
        extended.extend((1..=pad).map(|i| input[n - 1 - i]));

        for section in &self.sections {
            section.filter_in_place(&mut extended);
        }
        extended.reverse();
        for section in &self.sections {
            section.filter_in_place(&mut extended);
        }
        extended.reverse();

        extended[pad..pad + n].to_vec()
    }
}

/// Butterworth lowpass sections for `order` at `cutoff` Hz
pub fn butterworth_lowpass(cutoff: f64, fs: f64, order: usize) -> SectionCascade {
    butterworth(cutoff, fs, order, BiquadSection::lowpass, BiquadSection::first_order_lowpass)
}

/// Butterworth highpass sections for `order` at `cutoff` Hz
pub fn butterworth_highpass(cutoff: f64, fs: f64, order: usize) -> SectionCascade {
    butterworth(cutoff, fs, order, BiquadSection::highpass, BiquadSection::first_order_highpass)
}

fn butterworth(
    cutoff: f64,
    fs: f64,
    order: usize,
    pair: fn(f64, f64) -> BiquadSection,
    single: fn(f64) -> BiquadSection,
) -> SectionCascade {
    // Pre-warp frequency for bilinear transform
    let k = (PI * cutoff / fs).tan();

    let mut sections: Vec<BiquadSection> = (0..order / 2)
        .map(|i| {
            let theta = PI * (2 * i + 1) as f64 / (2 * order) as f64;
            pair(k, 1.0 / (2.0 * theta.sin()))
        })
        .collect();

    if order % 2 == 1 {
        sections.push(single(k));
    }

    SectionCascade::new(sections)
}

fn validate_order(order: usize) -> EegResult<()> {
    if order == 0 || order > MAX_FILTER_ORDER {
        return Err(EegError::invalid_parameter(
            "order",
            order as f64,
            format!("filter order must be between 1 and {}", MAX_FILTER_ORDER),
        ));
    }
    Ok(())
}

/// Cutoffs must be positive, finite and strictly below Nyquist
pub fn validate_cutoff(parameter: &'static str, cutoff: f64, fs: f64) -> EegResult<()> {
    if !cutoff.is_finite() || cutoff <= 0.0 {
        return Err(EegError::invalid_parameter(parameter, cutoff, "must be positive and finite"));
    }
    let nyquist = fs / 2.0;
    if cutoff >= nyquist {
        return Err(EegError::invalid_parameter(
            parameter,
            cutoff,
            format!("must be below the Nyquist frequency ({} Hz)", nyquist),
        ));
    }
    Ok(())
}

/// Run `cascade` zero-phase over every channel of `input`
fn filter_channels(input: &EegSignal, cascade: &SectionCascade) -> EegResult<EegSignal> {
    let rows = input
        .channels()
        .iter()
        .map(|row| cascade.filtfilt(row))
        .collect();
    input.derive(rows)
}

fn required(value: Option<f64>, parameter: &'static str) -> EegResult<f64> {
    value.ok_or_else(|| EegError::ConfigurationError {
        message: format!("filter requires '{}'", parameter),
    })
}

/// Zero-phase Butterworth lowpass, highpass or bandpass filter
#[derive(Debug, Clone)]
pub struct ButterworthFilter {
    filter_config: FilterConfig,
    name: String,
}

impl ButterworthFilter {
    /// Create new Butterworth filter; cutoffs are checked against the signal's
    /// Nyquist frequency when it is processed
    pub fn new(filter_config: FilterConfig) -> EegResult<Self> {
        validate_order(filter_config.order)?;

        let name = match filter_config.filter_type {
            FilterType::ButterworthLowpass => {
                required(filter_config.cutoff_freq, "cutoff_freq")?;
                "Butterworth Lowpass"
            }
            FilterType::ButterworthHighpass => {
                required(filter_config.cutoff_freq, "cutoff_freq")?;
                "Butterworth Highpass"
            }
            FilterType::ButterworthBandpass => {
                required(filter_config.low_cutoff, "low_cutoff")?;
                required(filter_config.high_cutoff, "high_cutoff")?;
                "Butterworth Bandpass"
            }
            FilterType::Notch => {
                return Err(EegError::ConfigurationError {
                    message: "Unsupported filter type for Butterworth filter".to_string(),
                });
            }
        };

        Ok(ButterworthFilter {
            filter_config,
            name: name.to_string(),
        })
    }

    pub fn filter_config(&self) -> &FilterConfig {
        &self.filter_config
    }

    /// Validate against `fs` and design the section cascade
    pub fn design(&self, fs: f64) -> EegResult<SectionCascade> {
        let order = self.filter_config.order;
        match self.filter_config.filter_type {
            FilterType::ButterworthLowpass => {
                let cutoff = required(self.filter_config.cutoff_freq, "cutoff_freq")?;
                validate_cutoff("lowpass_hz", cutoff, fs)?;
                Ok(butterworth_lowpass(cutoff, fs, order))
            }
            FilterType::ButterworthHighpass => {
                let cutoff = required(self.filter_config.cutoff_freq, "cutoff_freq")?;
                validate_cutoff("highpass_hz", cutoff, fs)?;
                Ok(butterworth_highpass(cutoff, fs, order))
            }
            FilterType::ButterworthBandpass => {
                let low = required(self.filter_config.low_cutoff, "low_cutoff")?;
                let high = required(self.filter_config.high_cutoff, "high_cutoff")?;
                validate_cutoff("band_low_hz", low, fs)?;
                validate_cutoff("band_high_hz", high, fs)?;
                if low >= high {
                    return Err(EegError::invalid_parameter(
                        "band_low_hz",
                        low,
                        format!("must be below the high cutoff ({} Hz)", high),
                    ));
                }
                Ok(butterworth_highpass(low, fs, order).chain(butterworth_lowpass(high, fs, order)))
            }
            FilterType::Notch => Err(EegError::ConfigurationError {
                message: "Unsupported filter type for Butterworth filter".to_string(),
            }),
        }
    }
}

impl SignalProcessor for ButterworthFilter {
    fn process(&self, input: &EegSignal) -> EegResult<EegSignal> {
        input.ensure_not_empty()?;
        let cascade = self.design(input.sampling_rate())?;

        let description = self.describe();
        debug!(
            filter = %description,
            channels = input.channel_count(),
            samples = input.samples_per_channel(),
            "applying zero-phase filter"
        );

        let mut output = filter_channels(input, &cascade)?;
        let config = &self.filter_config;
        match config.filter_type {
            FilterType::ButterworthLowpass => {
                if let Some(cutoff) = config.cutoff_freq {
                    output.metadata.record_lowpass(cutoff, description);
                }
            }
            FilterType::ButterworthHighpass => {
                if let Some(cutoff) = config.cutoff_freq {
                    output.metadata.record_highpass(cutoff, description);
                }
            }
            FilterType::ButterworthBandpass => {
                if let (Some(low), Some(high)) = (config.low_cutoff, config.high_cutoff) {
                    output.metadata.record_bandpass(low, high, description);
                }
            }
            FilterType::Notch => {}
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        let config = &self.filter_config;
        let edges = match config.filter_type {
            FilterType::ButterworthLowpass => {
                format!("lowpass {:.2} Hz", config.cutoff_freq.unwrap_or_default())
            }
            FilterType::ButterworthHighpass => {
                format!("highpass {:.2} Hz", config.cutoff_freq.unwrap_or_default())
            }
            _ => format!(
                "bandpass {:.2}-{:.2} Hz",
                config.low_cutoff.unwrap_or_default(),
                config.high_cutoff.unwrap_or_default()
            ),
        };
        format!("{} (Butterworth order {}, zero-phase)", edges, config.order)
    }
}

/// Zero-phase notch filter for powerline interference removal
#[derive(Debug, Clone)]
pub struct NotchFilter {
    notch_freq: f64,
    q_factor: f64,
    harmonics: bool,
}

impl NotchFilter {
    /// Create new notch filter
    pub fn new(notch_freq: f64, q_factor: f64) -> EegResult<Self> {
        if !notch_freq.is_finite() || notch_freq <= 0.0 {
            return Err(EegError::invalid_parameter("notch_hz", notch_freq, "must be positive and finite"));
        }
        if !q_factor.is_finite() || q_factor <= 0.0 {
            return Err(EegError::invalid_parameter("notch_q", q_factor, "must be positive and finite"));
        }

        Ok(NotchFilter {
            notch_freq,
            q_factor,
            harmonics: false,
        })
    }

    /// Build from a [`FilterType::Notch`] configuration
    pub fn from_config(config: &FilterConfig) -> EegResult<Self> {
        if config.filter_type != FilterType::Notch {
            return Err(EegError::ConfigurationError {
                message: "Notch filter requires a notch configuration".to_string(),
            });
        }
        let freq = required(config.notch_freq, "notch_freq")?;
        let q = required(config.notch_q, "notch_q")?;
        Ok(Self::new(freq, q)?.with_harmonics(config.notch_harmonics))
    }

    /// Also notch every harmonic below Nyquist
    pub fn with_harmonics(mut self, enabled: bool) -> Self {
        self.harmonics = enabled;
        self
    }

    pub fn notch_freq(&self) -> f64 {
        self.notch_freq
    }

    /// Frequencies that will be notched at sampling rate `fs`
    pub fn target_frequencies(&self, fs: f64) -> Vec<f64> {
        let nyquist = fs / 2.0;
        if !self.harmonics {
            return if self.notch_freq < nyquist { vec![self.notch_freq] } else { Vec::new() };
        }

        (1..)
            .map(|k| self.notch_freq * k as f64)
            .take_while(|&f| f < nyquist)
            .collect()
    }

    pub fn design(&self, fs: f64) -> SectionCascade {
        SectionCascade::new(
            self.target_frequencies(fs)
                .into_iter()
                .map(|f| BiquadSection::notch(f, self.q_factor, fs))
                .collect(),
        )
    }
}

impl SignalProcessor for NotchFilter {
    fn process(&self, input: &EegSignal) -> EegResult<EegSignal> {
        input.ensure_not_empty()?;

        let targets = self.target_frequencies(input.sampling_rate());
        let mut output = if targets.is_empty() {
            warn!(
                notch_hz = self.notch_freq,
                nyquist_hz = input.nyquist(),
                "notch frequency is not below Nyquist, nothing to remove"
            );
            input.derive(input.channels().to_vec())?
        } else {
            debug!(frequencies = ?targets, q = self.q_factor, "applying zero-phase notch");
            filter_channels(input, &self.design(input.sampling_rate()))?
        };

        output.metadata.record_step(if targets.is_empty() {
            format!("notch {:.2} Hz skipped (not below Nyquist)", self.notch_freq)
        } else {
            self.describe()
        });

        Ok(output)
    }

    fn name(&self) -> &str {
        "Notch Filter"
    }

    fn describe(&self) -> String {
        format!(
            "notch {:.2} Hz{} (Q {}, zero-phase)",
            self.notch_freq,
            if self.harmonics { " + harmonics" } else { "" },
            self.q_factor
        )
    }
}

/// Build the processor described by `config`
pub fn build_filter(config: &FilterConfig) -> EegResult<Box<dyn SignalProcessor>> {
    match config.filter_type {
        FilterType::Notch => Ok(Box::new(NotchFilter::from_config(config)?)),
        _ => Ok(Box::new(ButterworthFilter::new(config.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, fs: f64, seconds: f64) -> Vec<f64> {
        let n = (fs * seconds) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn mean_square(data: &[f64]) -> f64 {
        data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64
    }

    fn signal(rows: Vec<Vec<f64>>, fs: f64) -> EegSignal {
        let names = (0..rows.len()).map(|i| format!("Ch{}", i + 1)).collect();
        EegSignal::from_channels(rows, fs, names).unwrap()
    }

    #[test]
    fn test_lowpass_dc_gain_is_unity() {
        let cascade = butterworth_lowpass(40.0, 160.0, 4);
        assert_eq!(cascade.sections().len(), 2);
        let gain: f64 = cascade.sections().iter().map(|s| s.dc_gain()).product();
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let cascade = butterworth_highpass(1.0, 160.0, 3);
        assert_eq!(cascade.sections().len(), 2);
        for section in cascade.sections() {
            assert!(section.dc_gain().abs() < 1e-12);
        }

        let output = cascade.filtfilt(&vec![25.0; 800]);
        assert!(output.iter().all(|x| x.abs() < 1e-9));
    }

    #[test]
    fn test_filtfilt_preserves_length() {
        let cascade = butterworth_lowpass(10.0, 100.0, 4);
        for n in [1, 2, 5, 27, 1000] {
            let input: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
            assert_eq!(cascade.filtfilt(&input).len(), n);
        }
        assert!(cascade.filtfilt(&[]).is_empty());
    }

    #[test]
    fn test_butterworth_lowpass_attenuates_stopband() {
        let fs = 200.0;
        let filter = ButterworthFilter::new(FilterConfig::lowpass(20.0, 4)).unwrap();

        let pass = filter.process(&signal(vec![sine(5.0, 10.0, fs, 10.0)], fs)).unwrap();
        let stop = filter.process(&signal(vec![sine(60.0, 10.0, fs, 10.0)], fs)).unwrap();

        let pass_ms = mean_square(pass.channel_data(0).unwrap());
        // Edges carry reflection transients; judge the stopband on the interior
        let stop_ms = mean_square(&stop.channel_data(0).unwrap()[200..1800]);

        assert!((pass_ms - 50.0).abs() / 50.0 < 0.02, "passband power {}", pass_ms);
        assert!(stop_ms < 50.0 * 1e-6, "stopband power {}", stop_ms);
    }

    #[test]
    fn test_zero_phase_keeps_peak_alignment() {
        let fs = 200.0;
        let input = sine(5.0, 1.0, fs, 4.0);
        let filter = ButterworthFilter::new(FilterConfig::lowpass(30.0, 4)).unwrap();
        let output = filter.process(&signal(vec![input.clone()], fs)).unwrap();
        let output = output.channel_data(0).unwrap();

        // Compare in the middle, away from the edges
        for i in 300..500 {
            assert!((output[i] - input[i]).abs() < 0.01, "sample {} drifted", i);
        }
    }

    #[test]
    fn test_bandpass_rejects_inverted_edges() {
        let filter = ButterworthFilter::new(FilterConfig::bandpass(13.0, 8.0, 4)).unwrap();
        let err = filter.process(&signal(vec![vec![0.0; 100]], 100.0)).unwrap_err();
        assert!(matches!(err, EegError::InvalidFilterParameter { parameter: "band_low_hz", .. }));
    }

    #[test]
    fn test_cutoff_at_nyquist_rejected() {
        let filter = ButterworthFilter::new(FilterConfig::lowpass(50.0, 4)).unwrap();
        let err = filter.process(&signal(vec![vec![0.0; 100]], 100.0)).unwrap_err();
        assert!(matches!(err, EegError::InvalidFilterParameter { parameter: "lowpass_hz", .. }));
    }

    #[test]
    fn test_invalid_order_rejected() {
        assert!(ButterworthFilter::new(FilterConfig::lowpass(10.0, 0)).is_err());
        assert!(ButterworthFilter::new(FilterConfig::lowpass(10.0, MAX_FILTER_ORDER + 1)).is_err());
        assert!(ButterworthFilter::new(FilterConfig::notch(60.0, 30.0)).is_err());
    }

    #[test]
    fn test_notch_filter() {
        let fs = 250.0;
        let wanted = sine(10.0, 1.0, fs, 8.0);
        let hum = sine(60.0, 0.5, fs, 8.0);
        let mixed: Vec<f64> = wanted.iter().zip(&hum).map(|(a, b)| a + b).collect();

        let filter = NotchFilter::new(60.0, 30.0).unwrap();
        let output = filter.process(&signal(vec![mixed], fs)).unwrap();
        let output = output.channel_data(0).unwrap();

        assert_eq!(output.len(), wanted.len());
        let residual: Vec<f64> = output.iter().zip(&wanted).map(|(a, b)| a - b).collect();
        assert!(mean_square(&residual[250..1750]) < 1e-3 * mean_square(&hum));
    }

    #[test]
    fn test_notch_harmonics() {
        let filter = NotchFilter::new(50.0, 30.0).unwrap().with_harmonics(true);
        assert_eq!(filter.target_frequencies(500.0), vec![50.0, 100.0, 150.0, 200.0]);
        assert_eq!(filter.with_harmonics(false).target_frequencies(500.0), vec![50.0]);
    }

    #[test]
    fn test_notch_above_nyquist_is_noop() {
        let data = sine(10.0, 1.0, 100.0, 2.0);
        let filter = NotchFilter::new(60.0, 30.0).unwrap();
        let input = signal(vec![data.clone()], 100.0);
        let output = filter.process(&input).unwrap();

        assert_eq!(output.channel_data(0).unwrap(), data.as_slice());
        assert_ne!(output.id, input.id);
        assert!(output.metadata.history[0].contains("skipped"));
    }

    #[test]
    fn test_invalid_notch_parameters() {
        assert!(NotchFilter::new(0.0, 30.0).is_err());
        assert!(NotchFilter::new(f64::NAN, 30.0).is_err());
        assert!(NotchFilter::new(60.0, 0.0).is_err());
    }

    #[test]
    fn test_empty_signal_rejected() {
        let empty = signal(vec![vec![]], 100.0);
        let lowpass = ButterworthFilter::new(FilterConfig::lowpass(10.0, 4)).unwrap();
        let notch = NotchFilter::new(50.0, 30.0).unwrap();
        assert_eq!(lowpass.process(&empty).unwrap_err(), EegError::EmptySignal);
        assert_eq!(notch.process(&empty).unwrap_err(), EegError::EmptySignal);
    }

    #[test]
    fn test_filter_records_history() {
        let filter = ButterworthFilter::new(FilterConfig::bandpass(8.0, 13.0, 4)).unwrap();
        let output = filter.process(&signal(vec![sine(10.0, 1.0, 100.0, 2.0)], 100.0)).unwrap();

        assert_eq!(output.metadata.highpass_hz, Some(8.0));
        assert_eq!(output.metadata.lowpass_hz, Some(13.0));
        assert_eq!(output.metadata.history, vec![filter.describe()]);
    }

    #[test]
    fn test_build_filter() {
        let notch = build_filter(&FilterConfig::notch(50.0, 30.0)).unwrap();
        assert_eq!(notch.name(), "Notch Filter");
        let highpass = build_filter(&FilterConfig::highpass(1.0, 2)).unwrap();
        assert_eq!(highpass.name(), "Butterworth Highpass");
    }
}
