//! EegSignal: core container for multichannel EEG data

use crate::error::{EegError, EegResult};
use crate::metadata::RecordingMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Multichannel EEG recording, stored channel-major in microvolts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegSignal {
    /// Unique identifier for this signal
    pub id: Uuid,
    /// Samples indexed as `data[channel][sample]`
    data: Vec<Vec<f64>>,
    /// Recording metadata
    pub metadata: RecordingMetadata,
}

impl EegSignal {
    /// Create a new signal, checking that the data matches the metadata
    pub fn new(data: Vec<Vec<f64>>, metadata: RecordingMetadata) -> EegResult<Self> {
        if data.len() != metadata.channel_count() {
            return Err(EegError::InvalidSignalData {
                reason: format!(
                    "{} channel labels for {} data rows",
                    metadata.channel_count(),
                    data.len()
                ),
            });
        }

        let expected = data.first().map_or(0, Vec::len);
        for (channel, row) in data.iter().enumerate() {
            if row.len() != expected {
                return Err(EegError::ShapeMismatch {
                    channel,
                    expected,
                    actual: row.len(),
                });
            }
        }

        Ok(EegSignal {
            id: Uuid::new_v4(),
            data,
            metadata,
        })
    }

    /// Build a signal from raw rows, a sampling rate and channel labels
    pub fn from_channels(
        data: Vec<Vec<f64>>,
        sampling_rate: f64,
        channel_names: Vec<String>,
    ) -> EegResult<Self> {
        let metadata = RecordingMetadata::new(sampling_rate, channel_names)?;
        Self::new(data, metadata)
    }

    /// Create a derived signal with new sample values and this signal's metadata.
    ///
    /// The derived signal gets its own identifier and buffer; its shape must
    /// equal this signal's shape.
    pub fn derive(&self, data: Vec<Vec<f64>>) -> EegResult<EegSignal> {
        let derived = EegSignal::new(data, self.metadata.clone())?;
        if derived.samples_per_channel() != self.samples_per_channel() {
            return Err(EegError::ShapeMismatch {
                channel: 0,
                expected: self.samples_per_channel(),
                actual: derived.samples_per_channel(),
            });
        }
        Ok(derived)
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.data.len()
    }

    /// Number of samples in every channel
    pub fn samples_per_channel(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.channel_count() * self.samples_per_channel()
    }

    /// True when there are no channels or no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with [`EegError::EmptySignal`] when there is nothing to filter
    pub fn ensure_not_empty(&self) -> EegResult<()> {
        if self.is_empty() {
            Err(EegError::EmptySignal)
        } else {
            Ok(())
        }
    }

    pub fn sampling_rate(&self) -> f64 {
        self.metadata.sampling_rate
    }

    pub fn nyquist(&self) -> f64 {
        self.metadata.nyquist()
    }

    pub fn channel_names(&self) -> &[String] {
        &self.metadata.channel_names
    }

    /// All rows, `channels()[c][t]`
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// Samples of one channel
    pub fn channel_data(&self, channel_index: usize) -> EegResult<&[f64]> {
        self.data
            .get(channel_index)
            .map(Vec::as_slice)
            .ok_or_else(|| EegError::InvalidSignalData {
                reason: format!(
                    "Channel index {} out of bounds ({} channels)",
                    channel_index,
                    self.channel_count()
                ),
            })
    }

    /// Samples of the channel with the given label
    pub fn channel_by_name(&self, name: &str) -> EegResult<&[f64]> {
        let index = self.metadata.channel_index(name).ok_or_else(|| EegError::InvalidSignalData {
            reason: format!("Unknown channel '{}'", name),
        })?;
        self.channel_data(index)
    }

    /// Recording duration in seconds, `(samples - 1) / sampling_rate`
    pub fn duration(&self) -> f64 {
        let samples = self.samples_per_channel();
        if samples < 2 {
            0.0
        } else {
            (samples - 1) as f64 / self.sampling_rate()
        }
    }

    /// Sample times in seconds, starting at zero
    pub fn time_vector(&self) -> Vec<f64> {
        let dt = 1.0 / self.sampling_rate();
        (0..self.samples_per_channel())
            .map(|i| i as f64 * dt)
            .collect()
    }

    /// Mean squared amplitude over every channel and sample
    pub fn mean_square(&self) -> f64 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self
            .data
            .iter()
            .flat_map(|row| row.iter())
            .map(|x| x * x)
            .sum();
        sum_sq / count as f64
    }

    /// Calculate basic statistics for a channel
    pub fn channel_stats(&self, channel_index: usize) -> EegResult<ChannelStats> {
        let data = self.channel_data(channel_index)?;
        Ok(ChannelStats::calculate(data))
    }

    /// Copy out the samples whose times fall in `[start_time, end_time]`
    pub fn slice_time(&self, start_time: f64, end_time: f64) -> EegResult<EegSignal> {
        if !(start_time >= 0.0) || !(end_time <= self.duration()) || start_time >= end_time {
            return Err(EegError::InvalidSignalData {
                reason: format!(
                    "Invalid time range [{:.3}, {:.3}]s for signal duration {:.3}s",
                    start_time,
                    end_time,
                    self.duration()
                ),
            });
        }

        let fs = self.sampling_rate();
        let start_sample = (start_time * fs).ceil() as usize;
        let end_sample = ((end_time * fs).floor() as usize + 1).min(self.samples_per_channel());

        let sliced = self
            .data
            .iter()
            .map(|row| row[start_sample..end_sample].to_vec())
            .collect();

        EegSignal::new(sliced, self.metadata.clone())
    }
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev: variance.sqrt(),
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Ch{}", i + 1)).collect()
    }

    #[test]
    fn test_signal_creation() {
        let data = vec![vec![0.0; 160]; 2];
        let signal = EegSignal::from_channels(data, 160.0, labels(2)).unwrap();

        assert_eq!(signal.channel_count(), 2);
        assert_eq!(signal.samples_per_channel(), 160);
        assert_eq!(signal.len(), 320);
        assert!(!signal.is_empty());
        assert!((signal.duration() - 159.0 / 160.0).abs() < 1e-12);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let data = vec![vec![0.0; 10], vec![0.0; 9]];
        let err = EegSignal::from_channels(data, 100.0, labels(2)).unwrap_err();
        assert_eq!(err, EegError::ShapeMismatch { channel: 1, expected: 10, actual: 9 });
    }

    #[test]
    fn test_label_count_mismatch() {
        let data = vec![vec![0.0; 10]; 3];
        let result = EegSignal::from_channels(data, 100.0, labels(2));
        assert!(matches!(result, Err(EegError::InvalidSignalData { .. })));
    }

    #[test]
    fn test_empty_signal_is_representable() {
        let signal = EegSignal::from_channels(vec![vec![]; 2], 100.0, labels(2)).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.ensure_not_empty(), Err(EegError::EmptySignal));
        assert_eq!(signal.duration(), 0.0);

        let no_channels = EegSignal::from_channels(Vec::new(), 100.0, Vec::new()).unwrap();
        assert!(no_channels.is_empty());
    }

    #[test]
    fn test_channel_access() {
        let data = vec![vec![1.0, 2.0, 3.0], vec![-1.0, -2.0, -3.0]];
        let signal = EegSignal::from_channels(data, 100.0, vec!["Fz".into(), "Cz".into()]).unwrap();

        assert_eq!(signal.channel_data(1).unwrap(), &[-1.0, -2.0, -3.0]);
        assert_eq!(signal.channel_by_name("Fz").unwrap(), &[1.0, 2.0, 3.0]);
        assert!(signal.channel_data(2).is_err());
        assert!(signal.channel_by_name("Pz").is_err());
    }

    #[test]
    fn test_derive_gets_new_identity() {
        let signal = EegSignal::from_channels(vec![vec![1.0; 4]], 100.0, labels(1)).unwrap();
        let derived = signal.derive(vec![vec![2.0; 4]]).unwrap();

        assert_ne!(signal.id, derived.id);
        assert_eq!(signal.channel_data(0).unwrap(), &[1.0; 4]);
        assert_eq!(derived.channel_data(0).unwrap(), &[2.0; 4]);
        assert!(signal.derive(vec![vec![2.0; 3]]).is_err());
    }

    #[test]
    fn test_mean_square() {
        let data = vec![vec![1.0, -1.0], vec![2.0, -2.0]];
        let signal = EegSignal::from_channels(data, 100.0, labels(2)).unwrap();
        assert!((signal.mean_square() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_slice_time() {
        let data = vec![(0..1000).map(|i| i as f64).collect()];
        let signal = EegSignal::from_channels(data, 100.0, labels(1)).unwrap();

        let window = signal.slice_time(0.0, 1.0).unwrap();
        assert_eq!(window.samples_per_channel(), 101);
        assert_eq!(window.channel_data(0).unwrap()[100], 100.0);

        let times = window.time_vector();
        assert_eq!(times.len(), 101);
        assert_eq!(times[0], 0.0);
        assert!((times[100] - 1.0).abs() < 1e-12);

        assert!(signal.slice_time(5.0, 2.0).is_err());
        assert!(signal.slice_time(0.0, 20.0).is_err());
    }

    #[test]
    fn test_channel_stats() {
        let stats = ChannelStats::calculate(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(stats.mean, 0.0);
        assert!((stats.rms - 1.0).abs() < 1e-12);
        assert_eq!(stats.peak_to_peak, 2.0);
    }
}
