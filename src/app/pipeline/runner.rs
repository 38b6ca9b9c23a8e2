//! Fail-fast sequential pipeline runner
//!
//! Steps run one after another in the project directory. The first step
//! that fails to start, fails on the filesystem or exits non-zero stops the
//! run; later steps are never attempted.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use crate::app::events::{InstallEvent, InstallObserver};
use crate::app::pipeline::executor::{StepExecutor, StepFailure};
use crate::app::pipeline::{OutputLine, PipelineStep};
use crate::errors::{PipelineError, PipelineResult};

/// Runs an ordered list of steps through a [`StepExecutor`]
pub struct PipelineRunner<'a, E> {
    executor: &'a E,
    timeout: Option<Duration>,
}

impl<'a, E: StepExecutor> PipelineRunner<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self {
            executor,
            timeout: None,
        }
    }

    /// Bound the whole pipeline; on expiry the running child is killed
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every step in order inside `working_dir`
    ///
    /// Returns the number of steps that completed, which on success is
    /// `steps.len()`.
    ///
    /// # Errors
    ///
    /// Returns the `PipelineError` of the first failing step, or
    /// `PipelineError::Timeout` if the configured deadline passes.
    pub async fn run(
        &self,
        steps: &[PipelineStep],
        working_dir: &Path,
        observer: &mut dyn InstallObserver,
    ) -> PipelineResult<usize> {
        let run = self.run_steps(steps, working_dir, observer);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                error!("Pipeline exceeded {:?}", limit);
                PipelineError::Timeout {
                    seconds: limit.as_secs(),
                }
            })?,
            None => run.await,
        }
    }

    async fn run_steps(
        &self,
        steps: &[PipelineStep],
        working_dir: &Path,
        observer: &mut dyn InstallObserver,
    ) -> PipelineResult<usize> {
        let total = steps.len();

        for (position, step) in steps.iter().enumerate() {
            let index = position + 1;
            let label = step.to_string();
            info!("[{}/{}] {}", index, total, label);
            observer.on_event(&InstallEvent::StepStarted {
                index,
                total,
                step: step.clone(),
            });

            let outcome = self
                .executor
                .execute(step, working_dir, &mut |line: &OutputLine| observer.on_output(line))
                .await;

            let status = outcome.map_err(|failure| match failure {
                StepFailure::Spawn(source) => PipelineError::Spawn {
                    index,
                    step: label.clone(),
                    source,
                },
                StepFailure::FileOperation(source) => PipelineError::FileOperation {
                    index,
                    step: label.clone(),
                    source,
                },
                StepFailure::Wait(source) => PipelineError::Wait {
                    index,
                    step: label.clone(),
                    source,
                },
            })?;

            if !status.success() {
                error!("Step {} ({}) exited with {:?}", index, label, status.code);
                return Err(PipelineError::StepFailed {
                    index,
                    step: label,
                    code: status.code,
                });
            }
        }

        Ok(total)
    }
}
