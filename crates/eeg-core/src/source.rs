//! Signal source seam
//!
//! Fetching and decoding recordings lives outside the processing core. A
//! source receives an explicit [`SourceConfig`] instead of relying on a fixed
//! data directory or hard-coded subject/run numbers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::error::EegResult;
use crate::signal::EegSignal;

/// Which recording to load, and where recordings live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub subject_id: u32,
    pub run_id: u32,
    pub data_directory: PathBuf,
}

impl SourceConfig {
    pub fn new(subject_id: u32, run_id: u32, data_directory: impl Into<PathBuf>) -> Self {
        Self {
            subject_id,
            run_id,
            data_directory: data_directory.into(),
        }
    }

    /// Conventional per-recording location, `<data_directory>/S001/S001R01`
    pub fn recording_path(&self) -> PathBuf {
        let subject = format!("S{:03}", self.subject_id);
        self.data_directory
            .join(&subject)
            .join(format!("{}R{:02}", subject, self.run_id))
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(1, 1, "data")
    }
}

/// Anything that can produce a raw multichannel recording
pub trait SignalSource {
    /// Load the recording identified by `config`
    fn load(&mut self, config: &SourceConfig) -> EegResult<EegSignal>;

    /// Human-readable source name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_recording_path() {
        let config = SourceConfig::new(7, 3, "/tmp/eeg");
        assert_eq!(config.recording_path(), Path::new("/tmp/eeg/S007/S007R03"));
    }

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert_eq!(config.subject_id, 1);
        assert_eq!(config.run_id, 1);
        assert_eq!(config.data_directory, PathBuf::from("data"));
    }

    #[test]
    fn test_config_serde() {
        let config = SourceConfig::new(2, 4, "recordings");
        let json = serde_json::to_string(&config).unwrap();
        let back: SourceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
