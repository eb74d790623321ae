//! CLI argument parsing.
//!
//! Hand-rolled parser over any iterator of strings so every branch can be
//! exercised from tests without touching `std::env`.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::config::GeneratorConfig;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Values given on the command line that override the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--days`
    pub days: Option<usize>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--end-date`
    pub end_date: Option<NaiveDate>,
    /// `--user`
    pub user_id: Option<String>,
    /// `--out`
    pub output_dir: Option<PathBuf>,
}

impl Overrides {
    /// Apply every override that was given.
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(days) = self.days {
            config.series.days = days;
        }
        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(end_date) = self.end_date {
            config.series.end_date = Some(end_date);
        }
        if let Some(user_id) = &self.user_id {
            config.series.user_id.clone_from(user_id);
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory.clone_from(dir);
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate both tables.
    Generate {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
        /// Command-line overrides.
        overrides: Overrides,
        /// Enable verbose output.
        verbose: bool,
    },
    /// Regenerate several times and compare fingerprints.
    Verify {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
        /// Command-line overrides.
        overrides: Overrides,
        /// Number of verification runs.
        runs: usize,
    },
    /// Arguments could not be parsed.
    Invalid {
        /// What was wrong.
        message: String,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether the command asked for verbose output.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        matches!(self.command, Command::Generate { verbose: true, .. })
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "generate" | "gen" => Self::parse_generate_command(&args[2..]),
            "verify" => Self::parse_verify_command(&args[2..]),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_generate_command(rest: &[String]) -> Command {
        let mut parsed = Parsed::default();
        if let Err(message) = parsed.consume(rest, &["-v", "--verbose"]) {
            return Command::Invalid { message };
        }
        if parsed.runs.is_some() {
            return Command::Invalid {
                message: "'--runs' only applies to 'verify'".to_string(),
            };
        }
        Command::Generate {
            config_path: parsed.config_path,
            overrides: parsed.overrides,
            verbose: parsed.verbose,
        }
    }

    fn parse_verify_command(rest: &[String]) -> Command {
        let mut parsed = Parsed::default();
        if let Err(message) = parsed.consume(rest, &[]) {
            return Command::Invalid { message };
        }
        let runs = parsed.runs.unwrap_or(DEFAULT_VERIFY_RUNS);
        if runs < 2 {
            return Command::Invalid {
                message: format!("'--runs' must be at least 2, got {runs}"),
            };
        }
        Command::Verify {
            config_path: parsed.config_path,
            overrides: parsed.overrides,
            runs,
        }
    }
}

/// Runs performed by `verify` when `--runs` is absent.
pub const DEFAULT_VERIFY_RUNS: usize = 3;

/// Options that take a value.
const VALUE_OPTIONS: &[&str] = &[
    "-c",
    "--config",
    "--days",
    "--seed",
    "--end-date",
    "--user",
    "-o",
    "--out",
    "--runs",
];

#[derive(Debug, Default)]
struct Parsed {
    config_path: Option<PathBuf>,
    overrides: Overrides,
    runs: Option<usize>,
    verbose: bool,
}

impl Parsed {
    fn consume(&mut self, rest: &[String], flags: &[&str]) -> Result<(), String> {
        let mut i = 0;
        while i < rest.len() {
            let option = rest[i].as_str();
            if flags.contains(&option) {
                self.verbose = true;
                i += 1;
                continue;
            }
            if !VALUE_OPTIONS.contains(&option) {
                return Err(format!("unknown option '{option}'"));
            }

            let value = rest
                .get(i + 1)
                .map(String::as_str)
                .ok_or_else(|| format!("'{option}' requires a value"))?;

            match option {
                "-c" | "--config" => self.config_path = Some(PathBuf::from(value)),
                "--days" => self.overrides.days = Some(parse_value(option, value)?),
                "--seed" => self.overrides.seed = Some(parse_value(option, value)?),
                "--end-date" => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map_err(|_| format!("'{option}' expects YYYY-MM-DD, got '{value}'"))?;
                    self.overrides.end_date = Some(date);
                }
                "--user" => self.overrides.user_id = Some(value.to_string()),
                "-o" | "--out" => self.overrides.output_dir = Some(PathBuf::from(value)),
                "--runs" => self.runs = Some(parse_value(option, value)?),
                _ => return Err(format!("unknown option '{option}'")),
            }
            i += 2;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{option}' expects a non-negative integer, got '{value}'"))
}
