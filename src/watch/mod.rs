// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Keeping only template paths and re-anchoring them onto the watched root.
//! - Holding back each path until its writes have settled.
//!
//! It does **not** know about includes; it only turns filesystem changes into
//! `RuntimeEvent::FileChanged` events.

pub mod path_utils;
pub mod settle;
pub mod watcher;

pub use settle::SettleBuffer;
pub use watcher::{classify, spawn_watcher, WatchOptions, WatcherHandle};
