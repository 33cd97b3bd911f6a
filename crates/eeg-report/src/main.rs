//! EEG band-power report
//!
//! Loads a recording from the synthetic source, conditions it, decomposes it
//! into frequency bands and prints a text report.
//!
//! ```bash
//! # Eyes-closed rest, subject 1 run 1, 60 Hz mains
//! eeg-report
//!
//! # Drowsy recording for subject 3, European mains
//! eeg-report --subject 3 --pattern drowsy --powerline 50
//!
//! # Processing profile from a JSON file
//! eeg-report --config profile.json --log-level debug
//! ```

mod analysis;
mod output;

use analysis::run_analysis;
use anyhow::Context;
use clap::Parser;
use eeg_core::SourceConfig;
use eeg_processing::ProcessingConfig;
use eeg_simulation::{EegSimulator, RhythmPattern, SimulatorConfig};
use output::{TextReport, DEFAULT_CHANNEL_ROWS};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// EEG conditioning and band-power report
#[derive(Parser, Debug)]
#[command(name = "eeg-report")]
#[command(author, version, about = "Condition an EEG recording and report its band powers", long_about = None)]
struct Cli {
    /// Subject number
    #[arg(long, default_value_t = 1)]
    subject: u32,

    /// Run number within the subject
    #[arg(long, default_value_t = 1)]
    run: u32,

    /// Directory holding the recordings
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Seed of the synthetic source
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Brain state to simulate: rest, drowsy, sleep or focus
    #[arg(short, long, default_value = "rest")]
    pattern: RhythmPattern,

    /// Mains frequency in Hz, used for both interference and notch
    #[arg(long)]
    powerline: Option<f64>,

    /// Processing configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Channels listed in the per-channel table
    #[arg(long, default_value_t = DEFAULT_CHANNEL_ROWS)]
    channels: usize,

    /// Logging verbosity level, overridden by RUST_LOG
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn load_config(cli: &Cli) -> anyhow::Result<ProcessingConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration {}", path.display()))?;
            ProcessingConfig::from_json(&json)
                .with_context(|| format!("invalid configuration {}", path.display()))?
        }
        None => ProcessingConfig::default(),
    };

    if let Some(hz) = cli.powerline {
        config.conditioning = config.conditioning.with_powerline(hz);
    }
    config.validate().context("invalid processing configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    info!("eeg-report v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let source_config = SourceConfig::new(cli.subject, cli.run, cli.data_dir.clone());

    let simulator_config = SimulatorConfig {
        pattern: cli.pattern.clone(),
        powerline_hz: cli.powerline.or(SimulatorConfig::default().powerline_hz),
        seed: cli.seed,
        ..SimulatorConfig::default()
    };
    let mut source = EegSimulator::new(simulator_config).context("invalid simulator configuration")?;

    let report = run_analysis(&mut source, &source_config, &config).with_context(|| {
        format!(
            "analysis of subject {} run {} failed",
            source_config.subject_id, source_config.run_id
        )
    })?;

    println!("Profile: {}", config.name);
    println!("{}", TextReport::new(&report).with_channel_rows(cli.channels));
    Ok(())
}
