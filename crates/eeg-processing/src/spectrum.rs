//! Welch power spectral density estimation

use eeg_core::{EegError, EegResult, EegSignal, FrequencyBand};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Welch estimator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchConfig {
    /// Segment length in samples; shortened to the signal length when longer
    pub n_fft: usize,
    /// Samples shared by consecutive segments
    pub overlap: usize,
    /// Lowest reported frequency (Hz)
    pub fmin: f64,
    /// Highest reported frequency (Hz)
    pub fmax: f64,
}

impl Default for WelchConfig {
    fn default() -> Self {
        WelchConfig {
            n_fft: 256,
            overlap: 0,
            fmin: 1.0,
            fmax: 40.0,
        }
    }
}

impl WelchConfig {
    pub fn validate(&self) -> EegResult<()> {
        if self.n_fft == 0 {
            return Err(EegError::invalid_parameter("n_fft", 0.0, "segment length must be positive"));
        }
        if self.overlap >= self.n_fft {
            return Err(EegError::invalid_parameter(
                "overlap",
                self.overlap as f64,
                format!("must be smaller than the segment length ({})", self.n_fft),
            ));
        }
        if !self.fmin.is_finite() || self.fmin < 0.0 {
            return Err(EegError::invalid_parameter("fmin", self.fmin, "must be non-negative and finite"));
        }
        if !self.fmax.is_finite() || self.fmax <= self.fmin {
            return Err(EegError::invalid_parameter(
                "fmax",
                self.fmax,
                format!("must be finite and above fmin ({} Hz)", self.fmin),
            ));
        }
        Ok(())
    }

    pub fn validate_for(&self, sampling_rate: f64) -> EegResult<()> {
        self.validate()?;
        let nyquist = sampling_rate / 2.0;
        if self.fmin >= nyquist {
            return Err(EegError::invalid_parameter(
                "fmin",
                self.fmin,
                format!("must be below the Nyquist frequency ({} Hz)", nyquist),
            ));
        }
        Ok(())
    }
}

/// One-sided power spectral density per channel, in µV²/Hz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectrum {
    /// Bin centre frequencies (Hz), ascending
    pub frequencies: Vec<f64>,
    /// `channel_psd[c][k]` is the density of channel `c` at `frequencies[k]`
    pub channel_psd: Vec<Vec<f64>>,
    pub channel_names: Vec<String>,
    /// Spacing between bins (Hz)
    pub resolution_hz: f64,
}

impl PowerSpectrum {
    /// Density averaged over channels
    pub fn mean_psd(&self) -> Vec<f64> {
        let channels = self.channel_psd.len();
        if channels == 0 {
            return vec![0.0; self.frequencies.len()];
        }

        let mut mean = vec![0.0; self.frequencies.len()];
        for psd in &self.channel_psd {
            for (acc, value) in mean.iter_mut().zip(psd) {
                *acc += value;
            }
        }
        mean.iter_mut().for_each(|v| *v /= channels as f64);
        mean
    }

    /// Frequency of the largest channel-averaged density
    pub fn peak_frequency(&self) -> Option<f64> {
        let mean = self.mean_psd();
        let mut best: Option<(usize, f64)> = None;
        for (i, &value) in mean.iter().enumerate() {
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
        }
        best.map(|(i, _)| self.frequencies[i])
    }

    /// Channel-averaged power inside `band`, integrated over its bins (µV²)
    pub fn band_power(&self, band: &FrequencyBand) -> f64 {
        self.frequencies
            .iter()
            .zip(self.mean_psd())
            .filter(|(f, _)| band.contains(**f))
            .map(|(_, p)| p * self.resolution_hz)
            .sum()
    }
}

/// Periodic Hamming window
fn hamming(length: usize) -> Vec<f64> {
    (0..length)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / length as f64).cos())
        .collect()
}

/// Estimate the PSD of every channel with Welch's method.
///
/// Segments are mean-detrended and Hamming-windowed; periodograms are
/// averaged and scaled as a one-sided density.
pub fn welch_psd(signal: &EegSignal, config: &WelchConfig) -> EegResult<PowerSpectrum> {
    signal.ensure_not_empty()?;
    let fs = signal.sampling_rate();
    config.validate_for(fs)?;

    let samples = signal.samples_per_channel();
    let segment_len = config.n_fft.min(samples);
    let step = segment_len - config.overlap.min(segment_len - 1);
    let segment_count = (samples - segment_len) / step + 1;

    let window = hamming(segment_len);
    let scale = 1.0 / (fs * window.iter().map(|w| w * w).sum::<f64>());
    let resolution_hz = fs / segment_len as f64;

    // Bins kept in the output, and the one-sided doubling rule
    let last_bin = segment_len / 2;
    let bins: Vec<usize> = (0..=last_bin)
        .filter(|&k| {
            let f = k as f64 * resolution_hz;
            f >= config.fmin && f <= config.fmax
        })
        .collect();
    let doubled = |k: usize| k != 0 && !(segment_len % 2 == 0 && k == last_bin);

    debug!(
        segment_len,
        segment_count,
        resolution_hz,
        channels = signal.channel_count(),
        "estimating Welch PSD"
    );

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(segment_len);
    let mut buffer = vec![Complex::new(0.0, 0.0); segment_len];

    let mut channel_psd = Vec::with_capacity(signal.channel_count());
    for row in signal.channels() {
        let mut accumulated = vec![0.0; last_bin + 1];

        for segment in 0..segment_count {
            let start = segment * step;
            let data = &row[start..start + segment_len];
            let mean = data.iter().sum::<f64>() / segment_len as f64;

            for ((slot, &x), &w) in buffer.iter_mut().zip(data).zip(&window) {
                *slot = Complex::new((x - mean) * w, 0.0);
            }
            fft.process(&mut buffer);

            for (k, acc) in accumulated.iter_mut().enumerate() {
                *acc += buffer[k].norm_sqr();
            }
        }

        let psd: Vec<f64> = bins
            .iter()
            .map(|&k| {
                let factor = if doubled(k) { 2.0 } else { 1.0 };
                factor * scale * accumulated[k] / segment_count as f64
            })
            .collect();
        channel_psd.push(psd);
    }

    Ok(PowerSpectrum {
        frequencies: bins.iter().map(|&k| k as f64 * resolution_hz).collect(),
        channel_psd,
        channel_names: signal.channel_names().to_vec(),
        resolution_hz,
    })
}
