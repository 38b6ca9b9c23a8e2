//! MyLar Installer Library
//!
//! Scaffolds a new MyLar (Laravel-based admin) application from the latest
//! upstream release: download, extraction, dependency installation and
//! theme selection.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
