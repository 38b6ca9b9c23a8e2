//! Prelude module for the MyLar installer library
//!
//! Re-exports what a typical embedding needs, usable with a single
//! `use mylar_installer::prelude::*;` statement.

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::app::{
    CommandProbe, ControllingTerminal, CoordinatorConfig, HttpTransport, InstallCoordinator,
    InstallEvent, InstallObserver, InstallReport, InstallRequest, NonInteractive, PathProbe,
    PipelineStep, ProcessExecutor, ReleaseClient, SilentObserver, StepExecutor,
};

pub use crate::config::AppConfig;

pub use std::path::{Path, PathBuf};
