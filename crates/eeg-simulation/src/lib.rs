//! EEG-Simulation: synthetic EEG recordings
//!
//! Provides reproducible EEG signals with known rhythm content for testing,
//! benchmarking and the report tool.

pub mod rhythms;
pub mod simulator;

pub use rhythms::*;
pub use simulator::*;
