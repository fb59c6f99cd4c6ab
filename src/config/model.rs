// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ModuleFormat;

/// Configuration as read from a TOML file, before CLI overrides and
/// validation.
///
/// ```toml
/// [paths]
/// dir = "src/templates/raw"
/// out = "src/templates/compiled"
///
/// [compile]
/// wait_ms = 1000
/// format = "esm"
/// command = ["pug", "--client", "--no-debug", "--name", "template", "--path", "{file}"]
///
/// [watch]
/// stability_threshold_ms = 1000
/// poll_interval_ms = 100
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub compile: CompileSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PathsSection {
    /// Directory holding the Pug sources. Required (here or via `--dir`).
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Output directory. Defaults to `compiled` next to `dir`.
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// `[compile]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileSection {
    /// Debounce window: recompiles of one file within this many
    /// milliseconds are suppressed.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    #[serde(default)]
    pub format: ModuleFormat,

    /// Compiler argv; `{file}` is replaced with the template path.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Pipe the template text to the compiler's stdin.
    #[serde(default = "default_stdin")]
    pub stdin: bool,
}

fn default_wait_ms() -> u64 {
    1000
}

fn default_source_extension() -> String {
    "pug".to_string()
}

fn default_output_extension() -> String {
    "js".to_string()
}

fn default_command() -> Vec<String> {
    ["pug", "--client", "--no-debug", "--name", "template", "--path", "{file}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_stdin() -> bool {
    true
}

impl Default for CompileSection {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            source_extension: default_source_extension(),
            output_extension: default_output_extension(),
            format: ModuleFormat::default(),
            command: default_command(),
            stdin: default_stdin(),
        }
    }
}

/// `[watch]` section: write-settle behaviour of the watcher.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_stability_threshold_ms")]
    pub stability_threshold_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_stability_threshold_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            stability_threshold_ms: default_stability_threshold_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] via `TryFrom`; `dir` is known to exist and
/// the parent of `out` is known to exist.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub dir: PathBuf,
    pub out: PathBuf,
    pub compile: CompileSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        dir: PathBuf,
        out: PathBuf,
        compile: CompileSection,
        watch: WatchSection,
    ) -> Self {
        Self {
            dir,
            out,
            compile,
            watch,
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.compile.wait_ms)
    }
}
