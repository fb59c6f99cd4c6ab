// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use pugwatch::cli::{CliArgs, LogLevel};
use pugwatch::logging::filter_for;
use pugwatch::types::ModuleFormat;

#[test]
fn short_flags_map_to_overrides() {
    let args = CliArgs::try_parse_from(["pugwatch", "-d", "raw", "-o", "out", "-w", "250"]).unwrap();
    let overrides = args.overrides();

    assert_eq!(overrides.dir, Some(PathBuf::from("raw")));
    assert_eq!(overrides.out, Some(PathBuf::from("out")));
    assert_eq!(overrides.wait_ms, Some(250));
    assert_eq!(overrides.format, None);
    assert!(!args.once);
    assert!(!args.dry_run);
}

#[test]
fn format_accepts_commonjs_and_cjs() {
    for value in ["commonjs", "cjs"] {
        let args = CliArgs::try_parse_from(["pugwatch", "--format", value]).unwrap();
        assert_eq!(args.format, Some(ModuleFormat::CommonJs));
    }
    let args = CliArgs::try_parse_from(["pugwatch", "--format", "esm"]).unwrap();
    assert_eq!(args.format, Some(ModuleFormat::Esm));
    assert!(CliArgs::try_parse_from(["pugwatch", "--format", "amd"]).is_err());
}

#[test]
fn once_conflicts_with_skip_initial() {
    assert!(CliArgs::try_parse_from(["pugwatch", "--once", "--skip-initial"]).is_err());
    assert!(CliArgs::try_parse_from(["pugwatch", "--once", "--dry-run"]).is_ok());
}

#[test]
fn wait_must_be_a_number() {
    assert!(CliArgs::try_parse_from(["pugwatch", "-w", "soon"]).is_err());
}

#[test]
fn log_level_flag_becomes_the_filter() {
    let args = CliArgs::try_parse_from(["pugwatch", "--log-level", "debug"]).unwrap();
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));

    assert_eq!(
        filter_for(Some(LogLevel::Warn)).max_level_hint(),
        Some(LevelFilter::WARN)
    );
    assert_eq!(filter_for(args.log_level).max_level_hint(), Some(LevelFilter::DEBUG));
    assert!(CliArgs::try_parse_from(["pugwatch", "--log-level", "loud"]).is_err());
}
