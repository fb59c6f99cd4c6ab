// src/config/mod.rs

//! Configuration loading and validation for pugwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file and merge CLI overrides (`loader.rs`).
//! - Validate paths and compiler settings before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, ConfigOverrides};
pub use model::{CompileSection, ConfigFile, PathsSection, RawConfigFile, WatchSection};
