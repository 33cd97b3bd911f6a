//! EEG-Processing: conditioning and band-power analysis for EEG recordings
//!
//! Zero-phase filters, the conditioning pipeline, band decomposition, Welch
//! spectra and recording summaries.

pub mod pipeline;
pub mod filters;
pub mod processor;
pub mod config;
pub mod conditioning;
pub mod decomposer;
pub mod spectrum;
pub mod summary;

pub use pipeline::*;
pub use processor::{SignalProcessor, ProcessingMetrics};
pub use filters::{
    FilterType, ButterworthFilter, NotchFilter, FilterConfig, SectionCascade, BiquadSection,
    build_filter,
};
pub use config::{ProcessingConfig, ConditioningConfig};
pub use conditioning::{apply_highpass, apply_lowpass, apply_notch, condition, condition_with};
pub use decomposer::{
    decompose, dominant_band, BandComponent, BandDecomposer, BandDecomposition, BandPower,
    ChannelBandPowers,
};
pub use spectrum::{welch_psd, PowerSpectrum, WelchConfig};
pub use summary::RecordingSummary;
