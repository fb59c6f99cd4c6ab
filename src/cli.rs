// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::ConfigOverrides;
use crate::types::ModuleFormat;

/// Command-line arguments for `pugwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pugwatch",
    version,
    about = "Watch Pug templates and recompile them into client-side JavaScript modules.",
    long_about = None,
    after_help = "Examples:\n  pugwatch -d ./raw-pug\n  pugwatch -d ./raw-pug -o ./compiled -w 500"
)]
pub struct CliArgs {
    /// Directory where the Pug files are saved.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Directory to output compiled files.
    ///
    /// Default: `compiled` next to the source directory. Its parent must exist.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Milliseconds during which a just-compiled file is not recompiled.
    #[arg(short = 'w', long, value_name = "MS")]
    pub wait: Option<u64>,

    /// Path to a TOML config file.
    ///
    /// If omitted, `Pugwatch.toml` in the working directory is used when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Module format of the generated files.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<ModuleFormat>,

    /// Compile every template once and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Do not compile existing templates at startup; only react to changes.
    #[arg(long, conflicts_with = "once")]
    pub skip_initial: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PUGWATCH_LOG` (any `EnvFilter` directive) or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Scan templates, print the include graph, and compile nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dir: self.dir.clone(),
            out: self.out.clone(),
            wait_ms: self.wait,
            format: self.format,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
