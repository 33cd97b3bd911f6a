//! Error handling for the EEG toolkit
//!
//! Every failure in the core is local and synchronous: it is returned to the
//! immediate caller, never retried and never recovered from internally.

use core::fmt;

/// Result type alias for EEG toolkit operations
pub type EegResult<T> = Result<T, EegError>;

/// Error type for all EEG toolkit operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EegError {
    /// A filtering operation received zero channels or zero samples
    EmptySignal,

    /// A cutoff, band edge or filter setting is out of range
    InvalidFilterParameter {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was rejected
        value: f64,
        /// Why the value was rejected
        reason: String,
    },

    /// Per-channel arrays disagree on their length
    ShapeMismatch {
        /// Channel (row) where the mismatch was found
        channel: usize,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Signal data or metadata is inconsistent
    InvalidSignalData {
        /// Description of the problem
        reason: String,
    },

    /// Processing or simulation configuration is invalid
    ConfigurationError {
        /// Description of the configuration problem
        message: String,
    },

    /// A signal source could not produce a recording
    SourceError {
        /// Description of the source failure
        message: String,
    },
}

impl EegError {
    /// Shorthand for an [`EegError::InvalidFilterParameter`]
    pub fn invalid_parameter(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        EegError::InvalidFilterParameter {
            parameter,
            value,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EegError::EmptySignal => {
                write!(f, "Empty signal: at least one channel and one sample are required")
            }
            EegError::InvalidFilterParameter { parameter, value, reason } => {
                write!(f, "Invalid filter parameter '{}' = {}: {}", parameter, value, reason)
            }
            EegError::ShapeMismatch { channel, expected, actual } => {
                write!(f, "Shape mismatch at channel {}: expected {} samples, found {}",
                       channel, expected, actual)
            }
            EegError::InvalidSignalData { reason } => {
                write!(f, "Invalid signal data: {}", reason)
            }
            EegError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            EegError::SourceError { message } => {
                write!(f, "Signal source error: {}", message)
            }
        }
    }
}

impl std::error::Error for EegError {}
