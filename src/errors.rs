// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PugwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("The path {0:?} does not exist!")]
    SourceDirMissing(PathBuf),

    #[error("The path {parent:?} where the output directory {name:?} should live does not exist!")]
    OutputParentMissing { parent: PathBuf, name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PugwatchError>;
