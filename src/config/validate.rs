// src/config/validate.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PugwatchError, Result};

/// Directory name used for output when none is configured.
pub const DEFAULT_OUT_DIR_NAME: &str = "compiled";

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PugwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_compile(&raw)?;
        validate_watch(&raw)?;
        let dir = validate_source_dir(raw.paths.dir.as_deref())?;
        let out = validate_output_dir(&dir, raw.paths.out)?;
        Ok(ConfigFile::new_unchecked(dir, out, raw.compile, raw.watch))
    }
}

fn validate_source_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let Some(dir) = dir else {
        return Err(PugwatchError::ConfigError(
            "no source directory given; pass --dir or set [paths].dir".to_string(),
        ));
    };

    if !dir.is_dir() {
        return Err(PugwatchError::SourceDirMissing(dir.to_path_buf()));
    }
    Ok(dir.to_path_buf())
}

/// The output directory itself may be missing (it is created at startup),
/// but its parent must exist.
fn validate_output_dir(dir: &Path, out: Option<PathBuf>) -> Result<PathBuf> {
    let out = out.unwrap_or_else(|| default_out_dir(dir));

    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !parent.is_dir() {
        let name = out
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(PugwatchError::OutputParentMissing { parent, name });
    }
    Ok(out)
}

/// `compiled` next to the source directory.
pub fn default_out_dir(dir: &Path) -> PathBuf {
    match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_OUT_DIR_NAME),
        _ => dir.join(DEFAULT_OUT_DIR_NAME),
    }
}

fn validate_compile(cfg: &RawConfigFile) -> Result<()> {
    let compile = &cfg.compile;

    if compile.command.is_empty() || compile.command[0].trim().is_empty() {
        return Err(PugwatchError::ConfigError(
            "[compile].command must name a compiler program".to_string(),
        ));
    }

    for (key, ext) in [
        ("source_extension", &compile.source_extension),
        ("output_extension", &compile.output_extension),
    ] {
        if ext.trim_start_matches('.').trim().is_empty() {
            return Err(PugwatchError::ConfigError(format!(
                "[compile].{key} must not be empty"
            )));
        }
    }

    if compile.source_extension.trim_start_matches('.') == compile.output_extension.trim_start_matches('.') {
        return Err(PugwatchError::ConfigError(format!(
            "[compile].output_extension must differ from source_extension (both {:?})",
            compile.source_extension
        )));
    }

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.poll_interval_ms == 0 {
        return Err(PugwatchError::ConfigError(
            "[watch].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
