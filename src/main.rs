//! biosolar CLI - synthetic solar and wellness fixture generator
//!
//! Command-line interface for generating and verifying the paired tables.
//! All logic lives in the `cli` module for testability.

use std::process::ExitCode;

use biosolar::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_directive = if args.verbose() {
        "biosolar=debug"
    } else {
        "biosolar=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run_cli(args)
}
