//! Install orchestration
//!
//! [`InstallCoordinator`] drives one installation from start to finish:
//!
//! 1. preconditions ([`preflight`]), before any network or disk mutation
//! 2. latest release lookup
//! 3. archive download into a fresh temporary file in the working directory
//! 4. extraction into the target directory, then temporary file cleanup
//! 5. the post-extraction pipeline, run inside the target directory
//!
//! Each stage completes before the next begins and every failure ends the
//! run. There is no retry and no rollback of earlier filesystem changes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mylar_installer::app::{
//!     ControllingTerminal, CoordinatorConfig, InstallCoordinator, InstallRequest, PathProbe,
//!     ProcessExecutor, ReleaseClient, SilentObserver,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = InstallCoordinator::new(
//!     CoordinatorConfig::default(),
//!     ReleaseClient::new()?,
//!     ProcessExecutor::new(ControllingTerminal),
//!     PathProbe,
//! );
//!
//! let request = InstallRequest::new(
//!     Some("demo".to_string()),
//!     Some("flatlab".to_string()),
//!     std::env::current_dir()?,
//! );
//! let report = coordinator.install(&request, &mut SilentObserver).await?;
//! println!("Installed {} into {}", report.version, report.target.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod preflight;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::archive;
use crate::app::client::{ArchiveFetcher, HttpTransport, VersionResolver};
use crate::app::events::{InstallEvent, InstallObserver};
use crate::app::models::{InstallRequest, ReleaseVersion, TempArchivePath};
use crate::app::pipeline::{compose_pipeline, ComposerCommand, PipelineRunner, StepExecutor};
use crate::app::tools::CommandProbe;
use crate::errors::Result;

pub use config::CoordinatorConfig;

/// Outcome of a successful installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Directory the application was materialized into
    pub target: PathBuf,
    /// Release tag that was installed
    pub version: ReleaseVersion,
    /// Number of pipeline steps that ran
    pub steps_run: usize,
}

/// Runs installations against injected network, process and PATH seams
pub struct InstallCoordinator<H, E, P> {
    config: CoordinatorConfig,
    transport: H,
    executor: E,
    probe: P,
}

impl<H, E, P> InstallCoordinator<H, E, P>
where
    H: HttpTransport,
    E: StepExecutor,
    P: CommandProbe,
{
    pub fn new(config: CoordinatorConfig, transport: H, executor: E, probe: P) -> Self {
        Self {
            config,
            transport,
            executor,
            probe,
        }
    }

    pub fn transport(&self) -> &H {
        &self.transport
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Install the latest release for `request`
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails. Preconditions are
    /// checked before anything is downloaded or written.
    pub async fn install(
        &self,
        request: &InstallRequest,
        observer: &mut dyn InstallObserver,
    ) -> Result<InstallReport> {
        let theme = preflight::check(request, &self.config.theme_allow_list, &self.probe)?;
        let target = request.target_directory();

        info!(
            "Creating application in {} with theme {}",
            target.display(),
            theme
        );
        observer.on_event(&InstallEvent::Creating {
            target: target.clone(),
            theme: theme.to_string(),
        });

        let version = VersionResolver::new(&self.transport, &self.config.release_index_url)
            .resolve_latest()
            .await?;
        observer.on_event(&InstallEvent::VersionResolved {
            version: version.to_string(),
        });

        let fetcher = ArchiveFetcher::new(&self.transport, &self.config.download_url_template);
        let download_url = fetcher.download_url(&version)?;
        observer.on_event(&InstallEvent::Downloading {
            url: download_url.to_string(),
        });

        // Removed on drop, so cancellation at any await below cannot leak it
        let temp_archive = TempArchivePath::generate(&request.working_directory);
        if let Err(e) = fetcher.fetch(&version, &temp_archive).await {
            warn!("Download failed, discarding {}", temp_archive.path().display());
            return Err(e);
        }

        observer.on_event(&InstallEvent::Extracting {
            destination: target.clone(),
        });
        archive::extract_and_clean_up(temp_archive, &target).await?;

        let composer = ComposerCommand::discover(&request.working_directory, &self.probe);
        let steps = compose_pipeline(&composer, &theme);
        let steps_run = PipelineRunner::new(&self.executor)
            .with_timeout(self.config.pipeline_timeout)
            .run(&steps, &target, observer)
            .await?;

        info!("Installed {} into {}", version, target.display());
        observer.on_event(&InstallEvent::Completed {
            target: target.clone(),
        });

        Ok(InstallReport {
            target,
            version,
            steps_run,
        })
    }
}
