//! Plain-text rendering of an [`AnalysisReport`]

use crate::analysis::AnalysisReport;
use eeg_processing::ChannelBandPowers;
use std::fmt;

/// Channels listed in the per-channel table unless told otherwise
pub const DEFAULT_CHANNEL_ROWS: usize = 8;

/// Text report for one analysed recording
pub struct TextReport<'a> {
    report: &'a AnalysisReport,
    channel_rows: usize,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            channel_rows: DEFAULT_CHANNEL_ROWS,
        }
    }

    pub fn with_channel_rows(mut self, rows: usize) -> Self {
        self.channel_rows = rows;
        self
    }

    fn write_history(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing:")?;
        for (index, step) in self.report.conditioned.metadata.history.iter().enumerate() {
            writeln!(f, "  {}. {}", index + 1, step)?;
        }
        writeln!(f, "  ({} µs)", self.report.processing_time_us)
    }

    fn write_spectrum_peaks(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = |freq: Option<f64>| freq.map_or("-".to_string(), |hz| format!("{:.2} Hz", hz));
        writeln!(f, "Spectral Peak:")?;
        writeln!(f, "  Raw:         {}", peak(self.report.raw_spectrum.peak_frequency()))?;
        writeln!(f, "  Conditioned: {}", peak(self.report.conditioned_spectrum.peak_frequency()))
    }

    fn write_channel_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = &self.report.channel_powers;
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let shown = rows.len().min(self.channel_rows);
        writeln!(f, "Channel Band Powers (µV², {} of {} channels):", shown, rows.len())?;

        write!(f, "  {:<8}", "Channel")?;
        for entry in &first.powers {
            write!(f, " {:>10}", entry.band.name)?;
        }
        writeln!(f, "  Dominant")?;

        for row in rows.iter().take(shown) {
            writeln!(f, "{}", ChannelLine(row))?;
        }
        Ok(())
    }
}

/// One row of the per-channel table
struct ChannelLine<'a>(&'a ChannelBandPowers);

impl fmt::Display for ChannelLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.0;
        write!(f, "  {:<8}", row.channel)?;
        for entry in &row.powers {
            write!(f, " {:>10.2e}", entry.power)?;
        }
        let dominant = row.dominant().map_or("-", |p| p.band.name.as_str());
        write!(f, "  {}", dominant)
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recording: {}", self.report.raw.metadata)?;
        writeln!(f)?;
        self.write_history(f)?;
        writeln!(f)?;
        write!(f, "{}", self.report.summary)?;
        writeln!(f)?;
        self.write_spectrum_peaks(f)?;
        writeln!(f)?;
        self.write_channel_table(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use eeg_core::SourceConfig;
    use eeg_processing::ProcessingConfig;
    use eeg_simulation::{EegSimulator, SimulatorConfig};

    fn report() -> AnalysisReport {
        let mut source = EegSimulator::new(SimulatorConfig {
            duration_secs: 10.0,
            ..SimulatorConfig::default()
        })
        .unwrap();
        run_analysis(&mut source, &SourceConfig::new(5, 2, "data"), &ProcessingConfig::default()).unwrap()
    }

    #[test]
    fn test_report_sections() {
        let report = report();
        let text = TextReport::new(&report).to_string();

        assert!(text.contains("Recording: 19 channels @ 160 Hz (subject 005, run 02)"));
        assert!(text.contains("Processing:"));
        assert!(text.contains("  1. highpass 1.00 Hz"));
        assert!(text.contains("  3. notch 60.00 Hz"));
        assert!(text.contains("Dominant Band: Alpha"));
        assert!(text.contains("Conditioned: 10.00 Hz"));
        assert!(text.contains("Channel Band Powers (µV², 8 of 19 channels):"));
        assert!(text.contains(&format!("  {:<8} {:>10}", "Channel", "Delta")));
        assert!(text.trim_end().lines().last().unwrap().starts_with("  T7"));
    }

    #[test]
    fn test_channel_rows_limit() {
        let report = report();
        let text = TextReport::new(&report).with_channel_rows(2).to_string();

        assert!(text.contains("2 of 19 channels"));
        assert!(text.contains("  Fp1 "));
        assert!(text.contains("  Fp2 "));
        assert!(!text.contains("  F7 "));
    }

    #[test]
    fn test_channel_line_names_dominant_band() {
        let report = report();
        let line = ChannelLine(&report.channel_powers[18]).to_string();
        assert!(line.starts_with("  O2"));
        assert!(line.ends_with("Alpha"));
        assert_eq!(line.matches('e').count(), 4);
    }
}
