// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::types::ModuleFormat;

/// Name of the config file picked up from the working directory when no
/// `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "Pugwatch.toml";

/// Values from the command line that take precedence over the TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dir: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub wait_ms: Option<u64>,
    pub format: Option<ModuleFormat>,
}

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// Relative `[paths]` entries are resolved against the directory containing
/// the file. No semantic validation happens here.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;

    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    config.paths.dir = config.paths.dir.map(|d| base.join(d));
    config.paths.out = config.paths.out.map(|o| base.join(o));

    Ok(config)
}

/// Merge defaults, an optional TOML file and CLI overrides, then validate.
///
/// - With `config_path`, that file must exist.
/// - Without it, [`DEFAULT_CONFIG_FILE`] is used when present.
pub fn load_and_validate(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ConfigFile> {
    let mut raw = match config_path {
        Some(path) => load_from_path(path)?,
        None => {
            let default = default_config_path();
            if default.is_file() {
                load_from_path(&default)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    apply_overrides(&mut raw, overrides);
    absolutize(&mut raw)?;

    ConfigFile::try_from(raw)
}

/// CLI values win over anything from the file.
pub fn apply_overrides(raw: &mut RawConfigFile, overrides: &ConfigOverrides) {
    if let Some(dir) = &overrides.dir {
        raw.paths.dir = Some(dir.clone());
    }
    if let Some(out) = &overrides.out {
        raw.paths.out = Some(out.clone());
    }
    if let Some(wait_ms) = overrides.wait_ms {
        raw.compile.wait_ms = wait_ms;
    }
    if let Some(format) = overrides.format {
        raw.compile.format = format;
    }
}

fn absolutize(raw: &mut RawConfigFile) -> Result<()> {
    if let Some(dir) = raw.paths.dir.take() {
        raw.paths.dir = Some(std::path::absolute(dir)?);
    }
    if let Some(out) = raw.paths.out.take() {
        raw.paths.out = Some(std::path::absolute(out)?);
    }
    Ok(())
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
