// tests/config_loading.rs

mod common;
use crate::common::TestResult;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use pugwatch::config::loader::apply_overrides;
use pugwatch::config::validate::default_out_dir;
use pugwatch::config::{load_and_validate, load_from_path, ConfigFile, ConfigOverrides, RawConfigFile};
use pugwatch::errors::PugwatchError;
use pugwatch::types::ModuleFormat;

fn overrides_for(dir: PathBuf) -> ConfigOverrides {
    ConfigOverrides {
        dir: Some(dir),
        ..ConfigOverrides::default()
    }
}

#[test]
fn defaults_apply_when_only_dir_is_given() -> TestResult {
    let tmp = TempDir::new()?;
    let raw_dir = tmp.path().join("raw");
    fs::create_dir(&raw_dir)?;

    let cfg = load_and_validate(None, &overrides_for(raw_dir.clone()))?;

    assert_eq!(cfg.dir, raw_dir);
    assert_eq!(cfg.out, tmp.path().join("compiled"));
    assert_eq!(cfg.compile.wait_ms, 1000);
    assert_eq!(cfg.compile.format, ModuleFormat::Esm);
    assert_eq!(cfg.compile.source_extension, "pug");
    assert_eq!(cfg.compile.output_extension, "js");
    assert_eq!(cfg.compile.command[0], "pug");
    assert!(cfg.compile.command.iter().any(|a| a == "{file}"));
    assert_eq!(cfg.watch.stability_threshold_ms, 1000);
    assert_eq!(cfg.watch.poll_interval_ms, 100);
    Ok(())
}

#[test]
fn missing_source_dir_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    let missing = tmp.path().join("nope");

    let err = load_and_validate(None, &overrides_for(missing.clone())).unwrap_err();

    match err {
        PugwatchError::SourceDirMissing(path) => assert_eq!(path, missing),
        other => panic!("expected SourceDirMissing, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_output_parent_is_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    let raw_dir = tmp.path().join("raw");
    fs::create_dir(&raw_dir)?;

    let overrides = ConfigOverrides {
        dir: Some(raw_dir),
        out: Some(tmp.path().join("missing/compiled")),
        ..ConfigOverrides::default()
    };
    let err = load_and_validate(None, &overrides).unwrap_err();

    match err {
        PugwatchError::OutputParentMissing { parent, name } => {
            assert_eq!(parent, tmp.path().join("missing"));
            assert_eq!(name, "compiled");
        }
        other => panic!("expected OutputParentMissing, got {other:?}"),
    }
    Ok(())
}

#[test]
fn output_dir_itself_may_be_missing() -> TestResult {
    let tmp = TempDir::new()?;
    let raw_dir = tmp.path().join("raw");
    fs::create_dir(&raw_dir)?;

    let overrides = ConfigOverrides {
        dir: Some(raw_dir),
        out: Some(tmp.path().join("build")),
        ..ConfigOverrides::default()
    };
    let cfg = load_and_validate(None, &overrides)?;

    assert_eq!(cfg.out, tmp.path().join("build"));
    assert!(!cfg.out.exists());
    Ok(())
}

#[test]
fn toml_file_is_loaded_and_resolved_against_its_directory() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir_all(tmp.path().join("templates/raw"))?;
    fs::create_dir_all(tmp.path().join("dist"))?;

    let config_path = tmp.path().join("Pugwatch.toml");
    fs::write(
        &config_path,
        r#"
[paths]
dir = "templates/raw"
out = "dist/views"

[compile]
wait_ms = 250
format = "cjs"
command = ["node", "compile.js", "{file}"]
stdin = false

[watch]
stability_threshold_ms = 300
"#,
    )?;

    let cfg = load_and_validate(Some(config_path.as_path()), &ConfigOverrides::default())?;

    assert_eq!(cfg.dir, tmp.path().join("templates/raw"));
    assert_eq!(cfg.out, tmp.path().join("dist/views"));
    assert_eq!(cfg.compile.wait_ms, 250);
    assert_eq!(cfg.compile.format, ModuleFormat::CommonJs);
    assert_eq!(cfg.compile.command, vec!["node", "compile.js", "{file}"]);
    assert!(!cfg.compile.stdin);
    assert_eq!(cfg.watch.stability_threshold_ms, 300);
    assert_eq!(cfg.watch.poll_interval_ms, 100);
    Ok(())
}

#[test]
fn cli_overrides_win_over_the_file() -> TestResult {
    let tmp = TempDir::new()?;
    fs::create_dir_all(tmp.path().join("a"))?;
    fs::create_dir_all(tmp.path().join("b"))?;

    let config_path = tmp.path().join("Pugwatch.toml");
    fs::write(
        &config_path,
        "[paths]\ndir = \"a\"\n\n[compile]\nwait_ms = 5000\nformat = \"esm\"\n",
    )?;

    let overrides = ConfigOverrides {
        dir: Some(tmp.path().join("b")),
        out: None,
        wait_ms: Some(10),
        format: Some(ModuleFormat::CommonJs),
    };
    let cfg = load_and_validate(Some(config_path.as_path()), &overrides)?;

    assert_eq!(cfg.dir, tmp.path().join("b"));
    assert_eq!(cfg.compile.wait_ms, 10);
    assert_eq!(cfg.compile.format, ModuleFormat::CommonJs);
    assert_eq!(cfg.wait().as_millis(), 10);
    Ok(())
}

#[test]
fn explicit_config_path_must_exist() -> TestResult {
    let tmp = TempDir::new()?;
    let err = load_and_validate(
        Some(tmp.path().join("absent.toml").as_path()),
        &ConfigOverrides::default(),
    )
    .unwrap_err();

    assert!(matches!(err, PugwatchError::IoError(_)));
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let tmp = TempDir::new()?;
    let config_path = tmp.path().join("bad.toml");
    fs::write(&config_path, "[compile]\nwait_ms = \"soon\"\n")?;

    let err = load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, PugwatchError::TomlError(_)));
    Ok(())
}

#[test]
fn raw_config_without_dir_is_a_config_error() {
    let err = ConfigFile::try_from(RawConfigFile::default()).unwrap_err();
    assert!(matches!(err, PugwatchError::ConfigError(_)));
}

#[test]
fn invalid_compile_settings_are_rejected() -> TestResult {
    let tmp = TempDir::new()?;

    let base = || {
        let mut raw = RawConfigFile::default();
        apply_overrides(&mut raw, &overrides_for(tmp.path().to_path_buf()));
        raw
    };

    let mut empty_command = base();
    empty_command.compile.command.clear();
    assert!(matches!(
        ConfigFile::try_from(empty_command),
        Err(PugwatchError::ConfigError(_))
    ));

    let mut same_ext = base();
    same_ext.compile.output_extension = ".pug".to_string();
    assert!(matches!(
        ConfigFile::try_from(same_ext),
        Err(PugwatchError::ConfigError(_))
    ));

    let mut zero_poll = base();
    zero_poll.watch.poll_interval_ms = 0;
    assert!(matches!(
        ConfigFile::try_from(zero_poll),
        Err(PugwatchError::ConfigError(_))
    ));

    assert!(ConfigFile::try_from(base()).is_ok());
    Ok(())
}

#[test]
fn default_out_dir_is_a_sibling_named_compiled() {
    assert_eq!(
        default_out_dir(std::path::Path::new("/site/templates/raw")),
        PathBuf::from("/site/templates/compiled")
    );
}

#[test]
fn compile_settings_are_checked_alongside_paths() -> TestResult {
    let tmp = TempDir::new()?;
    let raw_dir = tmp.path().join("raw");
    fs::create_dir(&raw_dir)?;

    let mut raw = RawConfigFile::default();
    apply_overrides(
        &mut raw,
        &ConfigOverrides {
            dir: Some(raw_dir.clone()),
            out: Some(tmp.path().join("out")),
            ..ConfigOverrides::default()
        },
    );
    raw.compile.command = vec!["  ".to_string()];
    assert!(matches!(
        ConfigFile::try_from(raw.clone()),
        Err(PugwatchError::ConfigError(_))
    ));

    raw.compile.command = vec!["pug".to_string()];
    let cfg = ConfigFile::try_from(raw)?;
    assert_eq!(cfg.dir, raw_dir);
    assert_eq!(cfg.out, tmp.path().join("out"));
    Ok(())
}
