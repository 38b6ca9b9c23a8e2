//! Progress notifications emitted while an installation runs
//!
//! The coordinator never prints. Callers plug in an [`InstallObserver`] to
//! render stage transitions and the live output of pipeline steps.

use std::path::PathBuf;

use crate::app::pipeline::{OutputLine, PipelineStep};

/// Stage transitions of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    /// All preconditions passed
    Creating { target: PathBuf, theme: String },
    /// Latest release resolved
    VersionResolved { version: String },
    /// Release archive download started
    Downloading { url: String },
    /// Extraction into the target directory started
    Extracting { destination: PathBuf },
    /// A pipeline step is about to run (`index` is 1-based)
    StepStarted {
        index: usize,
        total: usize,
        step: PipelineStep,
    },
    /// Every pipeline step succeeded
    Completed { target: PathBuf },
}

/// Receives events and child output from a running installation
pub trait InstallObserver {
    fn on_event(&mut self, _event: &InstallEvent) {}

    /// Called for every chunk of child output as soon as it is read
    fn on_output(&mut self, _line: &OutputLine) {}
}

/// Observer that discards everything
#[derive(Debug, Default)]
pub struct SilentObserver;

impl InstallObserver for SilentObserver {}
