//! Command handlers for the MyLar installer CLI
//!
//! Wires the CLI arguments and loaded configuration to the install
//! coordinator with the real network, process and PATH implementations.

use tracing::{info, warn};

use crate::app::{
    ControllingTerminal, InstallCoordinator, InstallRequest, PathProbe, ProcessExecutor,
    ReleaseClient,
};
use crate::cli::{GlobalArgs, NewArgs, ProgressConfig};
use crate::cli::progress::ConsoleObserver;
use crate::config::AppConfig;
use crate::errors::{AppError, IoError, Result};

/// Handle the new command
///
/// Runs one installation into `<cwd>/<name>` (or the current directory when
/// no name is given). Ctrl-C aborts the run; a running child process is
/// killed when the install future is dropped.
pub async fn handle_new(args: NewArgs, global: &GlobalArgs, config: AppConfig) -> Result<()> {
    let working_directory = std::env::current_dir().map_err(IoError::WorkingDirectory)?;
    let request = InstallRequest::new(args.name, args.theme, working_directory);
    info!(
        "Installing into {} (theme: {:?})",
        request.target_directory().display(),
        request.theme_name
    );

    let client = ReleaseClient::with_config(&config.client)?;
    let coordinator = InstallCoordinator::new(
        config.installer,
        client,
        ProcessExecutor::new(ControllingTerminal),
        PathProbe,
    );

    let progress = if global.quiet {
        ProgressConfig::quiet()
    } else {
        ProgressConfig::default()
    };
    let mut observer = ConsoleObserver::new(progress);

    let report = tokio::select! {
        result = coordinator.install(&request, &mut observer) => result?,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            return Err(AppError::Interrupted);
        }
    };
    drop(observer);

    info!(
        "Installed {} into {} ({} steps)",
        report.version,
        report.target.display(),
        report.steps_run
    );
    println!("Application ready!");
    Ok(())
}
