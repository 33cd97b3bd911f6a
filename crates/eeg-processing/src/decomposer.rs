//! Band decomposition: per-band filtered signals and their mean power.
//!
//! Every band is filtered independently from the same input signal. Band
//! power is the mean squared amplitude over all channels and samples of the
//! band-limited signal, in µV².

use crate::filters::{ButterworthFilter, FilterConfig, MAX_FILTER_ORDER};
use crate::processor::SignalProcessor;
use eeg_core::{EegError, EegResult, EegSignal, FrequencyBand};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Mean squared amplitude of a signal restricted to one band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPower {
    pub band: FrequencyBand,
    pub power: f64,
}

/// Band-limited copy of the input together with its power
#[derive(Debug, Clone)]
pub struct BandComponent {
    pub band: FrequencyBand,
    pub signal: EegSignal,
    pub power: f64,
}

/// Band powers of a single channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBandPowers {
    pub channel: String,
    pub powers: Vec<BandPower>,
}

impl ChannelBandPowers {
    pub fn dominant(&self) -> Option<&BandPower> {
        dominant_band(&self.powers)
    }
}

/// Result of [`BandDecomposer::decompose`], in band declaration order
#[derive(Debug, Clone)]
pub struct BandDecomposition {
    components: Vec<BandComponent>,
}

impl BandDecomposition {
    /// Component for the band called `name`
    pub fn get(&self, name: &str) -> Option<&BandComponent> {
        self.components.iter().find(|c| c.band.name == name)
    }

    /// Power of the band called `name`
    pub fn power(&self, name: &str) -> Option<f64> {
        self.get(name).map(|c| c.power)
    }

    pub fn band_powers(&self) -> Vec<BandPower> {
        self.components
            .iter()
            .map(|c| BandPower {
                band: c.band.clone(),
                power: c.power,
            })
            .collect()
    }

    /// Band with the highest power; ties go to the band declared first
    pub fn dominant_band(&self) -> Option<&FrequencyBand> {
        let mut best: Option<&BandComponent> = None;
        for component in &self.components {
            if best.map_or(true, |b| component.power > b.power) {
                best = Some(component);
            }
        }
        best.map(|c| &c.band)
    }

    /// Mean squared amplitude of each channel in each band
    pub fn channel_powers(&self) -> Vec<ChannelBandPowers> {
        let channel_names = self
            .components
            .first()
            .map(|c| c.signal.channel_names().to_vec())
            .unwrap_or_default();

        channel_names
            .into_iter()
            .enumerate()
            .map(|(index, channel)| ChannelBandPowers {
                channel,
                powers: self
                    .components
                    .iter()
                    .map(|c| BandPower {
                        band: c.band.clone(),
                        power: c.signal.channel_data(index).map_or(0.0, mean_square),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<'a> IntoIterator for &'a BandDecomposition {
    type Item = &'a BandComponent;
    type IntoIter = std::slice::Iter<'a, BandComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Entry with the highest power; on a tie the earlier entry wins
pub fn dominant_band(powers: &[BandPower]) -> Option<&BandPower> {
    let mut best: Option<&BandPower> = None;
    for entry in powers {
        if best.map_or(true, |b| entry.power > b.power) {
            best = Some(entry);
        }
    }
    best
}

/// Splits a conditioned signal into frequency bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandDecomposer {
    filter_order: usize,
}

impl Default for BandDecomposer {
    fn default() -> Self {
        BandDecomposer { filter_order: 4 }
    }
}

impl BandDecomposer {
    pub fn new(filter_order: usize) -> EegResult<Self> {
        if filter_order == 0 || filter_order > MAX_FILTER_ORDER {
            return Err(EegError::invalid_parameter(
                "band_filter_order",
                filter_order as f64,
                format!("must be between 1 and {}", MAX_FILTER_ORDER),
            ));
        }
        Ok(BandDecomposer { filter_order })
    }

    pub fn filter_order(&self) -> usize {
        self.filter_order
    }

    /// Band-pass `signal` once per band and measure each result.
    ///
    /// The input is expected to be conditioned already; this is not checked.
    /// Every band is validated against the signal's Nyquist frequency before
    /// any filtering starts.
    pub fn decompose(&self, signal: &EegSignal, bands: &[FrequencyBand]) -> EegResult<BandDecomposition> {
        signal.ensure_not_empty()?;
        validate_bands(bands, signal.sampling_rate())?;

        let mut components = Vec::with_capacity(bands.len());
        for band in bands {
            let filter = ButterworthFilter::new(FilterConfig::bandpass(band.low_hz, band.high_hz, self.filter_order))?;
            debug!(band = %band, order = self.filter_order, "band-limiting");

            let filtered = filter.process(signal)?;
            let power = filtered.mean_square();
            info!(band = %band.name, power, "band power");

            components.push(BandComponent {
                band: band.clone(),
                signal: filtered,
                power,
            });
        }

        Ok(BandDecomposition { components })
    }
}

/// Decompose with the default filter order
pub fn decompose(signal: &EegSignal, bands: &[FrequencyBand]) -> EegResult<BandDecomposition> {
    BandDecomposer::default().decompose(signal, bands)
}

fn mean_square(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64
    }
}

fn validate_bands(bands: &[FrequencyBand], sampling_rate: f64) -> EegResult<()> {
    if bands.is_empty() {
        return Err(EegError::invalid_parameter("bands", 0.0, "at least one band is required"));
    }

    let mut seen = HashSet::new();
    for band in bands {
        if !seen.insert(band.name.as_str()) {
            return Err(EegError::invalid_parameter(
                "bands",
                band.low_hz,
                format!("band '{}' is listed more than once", band.name),
            ));
        }
        band.validate_for(sampling_rate)?;
    }
    Ok(())
}
