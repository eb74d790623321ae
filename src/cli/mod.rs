//! CLI module for biosolar.
//!
//! All CLI logic lives here rather than in `main.rs` so it can be tested.
//! The entry point `run_cli` is called from `main.rs` with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, Overrides, DEFAULT_VERIFY_RUNS};
pub use commands::{
    generate, resolve_config, run_cli, run_generate, run_verify, verify, GenerateSummary,
    VerifySummary,
};
pub use output::{print_generate_summary, print_help, print_verify_summary, print_version};

#[cfg(test)]
mod tests;
