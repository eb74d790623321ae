//! CLI output formatting.

use super::commands::{GenerateSummary, VerifySummary};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    match option_env!("BIOSOLAR_GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            println!("biosolar {} ({hash})", env!("BIOSOLAR_VERSION"));
        }
        _ => println!("biosolar {}", env!("BIOSOLAR_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"biosolar - Synthetic solar exposure and wellness fixture generator

USAGE:
    biosolar <COMMAND> [OPTIONS]

COMMANDS:
    generate                    Generate solar and bio tables
        -c, --config <FILE>     YAML configuration file
        --days <N>              Number of simulated days (default: 60)
        --seed <N>              Master seed (default: 42)
        --end-date <DATE>       Last simulated day, YYYY-MM-DD (default: today)
        --user <ID>             Subject identifier (default: usr_001)
        -o, --out <DIR>         Output directory (default: data/raw)
        -v, --verbose           Enable debug logging

    verify                      Regenerate and compare fingerprints
        --runs <N>              Number of runs (default: 3)
        (accepts the generate options except --verbose)

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    biosolar generate
    biosolar generate --days 90 --seed 7 --end-date 2024-11-30
    biosolar generate --config fixtures.yaml --out tests/data
    biosolar verify --seed 7 --runs 5

Logging honours RUST_LOG (e.g. RUST_LOG=biosolar=debug).
"
    );
}

/// Print the outcome of `generate`.
pub fn print_generate_summary(summary: &GenerateSummary) {
    let report = &summary.report;
    println!("✓ Generated {} days of Solar Data", report.solar_rows);
    println!("    {}", report.solar_path.display());
    println!("✓ Generated {} days of Bio Data", report.bio_rows);
    println!("    {}", report.bio_path.display());
    println!();
    println!("  Seed:        {}", summary.seed);
    println!("  Fingerprint: {}", summary.fingerprint);
}

/// Print the outcome of `verify`.
pub fn print_verify_summary(summary: &VerifySummary) {
    let sym = if summary.identical { "✓" } else { "✗" };
    let status = if summary.identical { "PASSED" } else { "FAILED" };

    println!("{RULE}");
    println!("Reproducibility Check");
    println!("{RULE}\n");

    println!("  Runs:      {}", summary.runs);
    println!("  Seed:      {}", summary.seed);
    println!("  Days:      {}", summary.days);
    println!("  Identical: {}", summary.identical);
    println!("\n  Reference Hash: {}", summary.reference_hash);

    if !summary.identical {
        println!("\n  Run Hashes:");
        for (i, hash) in summary.run_hashes.iter().enumerate() {
            let mark = if *hash == summary.reference_hash {
                "✓"
            } else {
                "✗"
            };
            println!("    {mark} Run {}: {hash}", i + 1);
        }
    }

    println!("\n{RULE}");
    println!("{sym} Reproducibility: {status}");
    println!("{RULE}");
}
