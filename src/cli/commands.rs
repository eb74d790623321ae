//! CLI command handlers.
//!
//! The `run_*` functions do the work and return data; the public command
//! functions print and map the outcome to an exit code.

use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error};

use crate::config::GeneratorConfig;
use crate::error::SimResult;
use crate::persistence::{write_dataset, WriteReport};
use crate::series::Dataset;

use super::args::Overrides;
use super::output::{print_generate_summary, print_help, print_verify_summary, print_version};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Generate {
            config_path,
            overrides,
            ..
        } => generate(config_path.as_deref(), &overrides),
        Command::Verify {
            config_path,
            overrides,
            runs,
        } => verify(config_path.as_deref(), &overrides, runs),
        Command::Invalid { message } => {
            eprintln!("Error: {message}");
            eprintln!("Run 'biosolar help' for usage.");
            ExitCode::from(1)
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Generate and write both tables.
#[must_use]
pub fn generate(config_path: Option<&Path>, overrides: &Overrides) -> ExitCode {
    let result = resolve_config(config_path, overrides).and_then(|config| run_generate(&config));
    match result {
        Ok(summary) => {
            print_generate_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Verify that repeated generation is bit-for-bit reproducible.
#[must_use]
pub fn verify(config_path: Option<&Path>, overrides: &Overrides, runs: usize) -> ExitCode {
    let result =
        resolve_config(config_path, overrides).and_then(|config| run_verify(&config, runs));
    match result {
        Ok(summary) => {
            print_verify_summary(&summary);
            if summary.identical {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "verification failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Load the configuration file (or defaults) and apply overrides.
///
/// The end date is pinned so that every use of the returned configuration
/// sees the same calendar day.
///
/// # Errors
///
/// Returns the load or validation error.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> SimResult<GeneratorConfig> {
    let mut config = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            GeneratorConfig::load(path)?
        }
        None => GeneratorConfig::default(),
    };
    overrides.apply(&mut config);
    config.series.end_date = Some(config.series.resolved_end_date());
    config.check()?;
    Ok(config)
}

/// Result of `generate`.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Seed used.
    pub seed: u64,
    /// Dataset fingerprint.
    pub fingerprint: String,
    /// Files written.
    pub report: WriteReport,
}

/// Generate the dataset and write it to the configured location.
///
/// # Errors
///
/// Returns any generation, guard or I/O error.
pub fn run_generate(config: &GeneratorConfig) -> SimResult<GenerateSummary> {
    let dataset = Dataset::generate(config)?;
    let fingerprint = dataset.fingerprint()?;
    let report = write_dataset(&dataset, &config.output)?;
    Ok(GenerateSummary {
        seed: dataset.seed,
        fingerprint,
        report,
    })
}

/// Result of `verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySummary {
    /// Number of runs performed.
    pub runs: usize,
    /// Seed used.
    pub seed: u64,
    /// Days per run.
    pub days: usize,
    /// Whether every run produced the same fingerprint.
    pub identical: bool,
    /// Fingerprint of the first run.
    pub reference_hash: String,
    /// Fingerprint of every run, in order.
    pub run_hashes: Vec<String>,
}

/// Regenerate the dataset `runs` times and compare fingerprints.
///
/// # Errors
///
/// Returns the first generation error.
pub fn run_verify(config: &GeneratorConfig, runs: usize) -> SimResult<VerifySummary> {
    let run_hashes = (0..runs)
        .map(|run| {
            let hash = Dataset::generate(config)?.fingerprint()?;
            debug!(run, %hash, "verification run");
            Ok(hash)
        })
        .collect::<SimResult<Vec<_>>>()?;

    let reference_hash = run_hashes.first().cloned().unwrap_or_default();
    let identical = run_hashes.iter().all(|h| *h == reference_hash);

    Ok(VerifySummary {
        runs,
        seed: config.reproducibility.seed,
        days: config.series.days,
        identical,
        reference_hash,
        run_hashes,
    })
}
