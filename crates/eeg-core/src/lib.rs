//! EEG-Core: Foundation types for EEG band-power analysis
//!
//! Signals, recording metadata, frequency bands, errors and the signal source seam.

pub mod signal;
pub mod metadata;
pub mod band;
pub mod source;
pub mod error;

pub use signal::*;
pub use metadata::RecordingMetadata;
pub use band::FrequencyBand;
pub use source::{SignalSource, SourceConfig};
pub use error::{EegError, EegResult};
