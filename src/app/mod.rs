//! Core application logic for the MyLar installer
//!
//! This module contains the installation stages (release lookup, download,
//! extraction, post-extraction pipeline) and the coordinator that runs them
//! in order.

pub mod archive;
pub mod client;
pub mod coordinator;
pub mod events;
pub mod hash;
pub mod models;
pub mod pipeline;
pub mod tools;

// Re-export main public API
pub use client::{ArchiveFetcher, ClientConfig, HttpTransport, ReleaseClient, VersionResolver};
pub use coordinator::{CoordinatorConfig, InstallCoordinator, InstallReport};
pub use events::{InstallEvent, InstallObserver, SilentObserver};
pub use models::{InstallRequest, ReleaseVersion, TempArchivePath, ThemeName};
pub use pipeline::{
    compose_pipeline, ComposerCommand, ControllingTerminal, NonInteractive, OutputLine,
    OutputStream, PipelineRunner, PipelineStep, ProcessExecutor, StepExecutor, StepFailure,
    StepStatus, TerminalCapability,
};
pub use tools::{CommandProbe, PathProbe};
