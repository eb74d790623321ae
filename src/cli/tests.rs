//! CLI module tests.

use super::args::{Args, Command, Overrides, DEFAULT_VERIFY_RUNS};
use super::commands::{resolve_config, run_cli, run_generate, run_verify};
use crate::config::GeneratorConfig;
use crate::persistence::read_dataset;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::ExitCode;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invalid_message(args: &Args) -> &str {
    match &args.command {
        Command::Invalid { message } => message,
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["biosolar"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        let args = Args::parse_from(["biosolar", flag]);
        assert_eq!(args.command, Command::Help, "{flag}");
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        let args = Args::parse_from(["biosolar", flag]);
        assert_eq!(args.command, Command::Version, "{flag}");
    }
}

#[test]
fn test_parse_unknown_command_shows_help() {
    let args = Args::parse_from(["biosolar", "frobnicate"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_generate_defaults() {
    let args = Args::parse_from(["biosolar", "generate"]);
    assert_eq!(
        args.command,
        Command::Generate {
            config_path: None,
            overrides: Overrides::default(),
            verbose: false,
        }
    );
    assert!(!args.verbose());
}

#[test]
fn test_parse_generate_alias() {
    let args = Args::parse_from(["biosolar", "gen", "--days", "5"]);
    assert!(matches!(args.command, Command::Generate { .. }));
}

#[test]
fn test_parse_generate_all_options() {
    let args = Args::parse_from([
        "biosolar",
        "generate",
        "--config",
        "fixtures.yaml",
        "--days",
        "90",
        "--seed",
        "7",
        "--end-date",
        "2024-11-30",
        "--user",
        "usr_042",
        "--out",
        "out/dir",
        "-v",
    ]);

    assert!(args.verbose());
    let Command::Generate {
        config_path,
        overrides,
        verbose,
    } = args.command
    else {
        panic!("expected Generate");
    };
    assert_eq!(config_path, Some(PathBuf::from("fixtures.yaml")));
    assert!(verbose);
    assert_eq!(
        overrides,
        Overrides {
            days: Some(90),
            seed: Some(7),
            end_date: Some(date(2024, 11, 30)),
            user_id: Some("usr_042".to_string()),
            output_dir: Some(PathBuf::from("out/dir")),
        }
    );
}

#[test]
fn test_parse_generate_short_options() {
    let args = Args::parse_from(["biosolar", "generate", "-c", "a.yaml", "-o", "x", "--verbose"]);
    let Command::Generate {
        config_path,
        overrides,
        verbose,
    } = args.command
    else {
        panic!("expected Generate");
    };
    assert_eq!(config_path, Some(PathBuf::from("a.yaml")));
    assert_eq!(overrides.output_dir, Some(PathBuf::from("x")));
    assert!(verbose);
}

#[test]
fn test_parse_generate_missing_value() {
    let args = Args::parse_from(["biosolar", "generate", "--days"]);
    assert!(invalid_message(&args).contains("requires a value"));
}

#[test]
fn test_parse_generate_bad_number() {
    let args = Args::parse_from(["biosolar", "generate", "--days", "-3"]);
    assert!(invalid_message(&args).contains("--days"));
}

#[test]
fn test_parse_generate_bad_date() {
    let args = Args::parse_from(["biosolar", "generate", "--end-date", "30/11/2024"]);
    assert!(invalid_message(&args).contains("YYYY-MM-DD"));
}

#[test]
fn test_parse_generate_unknown_option() {
    let args = Args::parse_from(["biosolar", "generate", "--colour"]);
    assert!(invalid_message(&args).contains("unknown option '--colour'"));
}

#[test]
fn test_parse_generate_rejects_runs() {
    let args = Args::parse_from(["biosolar", "generate", "--runs", "4"]);
    assert!(invalid_message(&args).contains("--runs"));
}

#[test]
fn test_parse_verify_defaults() {
    let args = Args::parse_from(["biosolar", "verify"]);
    assert_eq!(
        args.command,
        Command::Verify {
            config_path: None,
            overrides: Overrides::default(),
            runs: DEFAULT_VERIFY_RUNS,
        }
    );
    assert!(!args.verbose());
}

#[test]
fn test_parse_verify_runs_and_seed() {
    let args = Args::parse_from(["biosolar", "verify", "--runs", "5", "--seed", "11"]);
    let Command::Verify {
        overrides, runs, ..
    } = args.command
    else {
        panic!("expected Verify");
    };
    assert_eq!(runs, 5);
    assert_eq!(overrides.seed, Some(11));
}

#[test]
fn test_parse_verify_rejects_single_run() {
    let args = Args::parse_from(["biosolar", "verify", "--runs", "1"]);
    assert!(invalid_message(&args).contains("at least 2"));
}

#[test]
fn test_parse_verify_rejects_verbose() {
    let args = Args::parse_from(["biosolar", "verify", "-v"]);
    assert!(invalid_message(&args).contains("unknown option '-v'"));
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_overrides_apply_only_given_fields() {
    let mut config = GeneratorConfig::default();
    let overrides = Overrides {
        seed: Some(99),
        ..Overrides::default()
    };
    overrides.apply(&mut config);

    assert_eq!(config.reproducibility.seed, 99);
    assert_eq!(config.series.days, GeneratorConfig::default().series.days);
    assert_eq!(config.series.user_id, "usr_001");
}

#[test]
fn test_resolve_config_pins_end_date() {
    let config = resolve_config(None, &Overrides::default()).unwrap();
    assert!(config.series.end_date.is_some());
}

#[test]
fn test_resolve_config_rejects_zero_days() {
    let overrides = Overrides {
        days: Some(0),
        ..Overrides::default()
    };
    assert!(resolve_config(None, &overrides).is_err());
}

#[test]
fn test_resolve_config_from_file_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biosolar.yaml");
    std::fs::write(
        &path,
        "reproducibility:\n  seed: 5\nseries:\n  days: 10\n  end_date: 2024-03-01\n",
    )
    .unwrap();

    let overrides = Overrides {
        days: Some(20),
        ..Overrides::default()
    };
    let config = resolve_config(Some(&path), &overrides).unwrap();

    assert_eq!(config.reproducibility.seed, 5);
    assert_eq!(config.series.days, 20);
    assert_eq!(config.series.end_date, Some(date(2024, 3, 1)));
}

#[test]
fn test_resolve_config_missing_file() {
    let missing = PathBuf::from("/definitely/not/here/biosolar.yaml");
    assert!(resolve_config(Some(&missing), &Overrides::default()).is_err());
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_run_generate_writes_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder()
        .seed(42)
        .days(14)
        .end_date(date(2024, 6, 30))
        .output_dir(dir.path())
        .build();

    let summary = run_generate(&config).unwrap();

    assert_eq!(summary.seed, 42);
    assert_eq!(summary.report.solar_rows, 14);
    assert_eq!(summary.report.bio_rows, 14);
    assert_eq!(summary.fingerprint.len(), 64);

    let (solar, bio) = read_dataset(&config.output).unwrap();
    assert_eq!(solar.len(), 14);
    assert_eq!(bio.len(), 14);
    assert_eq!(solar.last().map(|r| r.date), Some(date(2024, 6, 30)));
}

#[test]
fn test_run_verify_is_identical() {
    let config = GeneratorConfig::builder()
        .seed(3)
        .days(30)
        .end_date(date(2024, 1, 31))
        .build();

    let summary = run_verify(&config, 4).unwrap();

    assert_eq!(summary.runs, 4);
    assert_eq!(summary.run_hashes.len(), 4);
    assert!(summary.identical);
    assert!(summary
        .run_hashes
        .iter()
        .all(|h| *h == summary.reference_hash));
}

#[test]
fn test_run_verify_hash_depends_on_seed() {
    let with_seed = |seed| {
        GeneratorConfig::builder()
            .seed(seed)
            .days(30)
            .end_date(date(2024, 1, 31))
            .build()
    };
    let a = run_verify(&with_seed(1), 2).unwrap();
    let b = run_verify(&with_seed(2), 2).unwrap();
    assert_ne!(a.reference_hash, b.reference_hash);
}

#[test]
fn test_run_cli_invalid_arguments_exit_one() {
    let code = run_cli(Args::parse_from(["biosolar", "generate", "--colour"]));
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(1)));
}

#[test]
fn test_run_cli_help_exits_zero() {
    let code = run_cli(Args::parse_from(["biosolar", "help"]));
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
}
