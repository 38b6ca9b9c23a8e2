//! Precondition checks run before anything touches the network or disk
//!
//! Order: archive support, yarn on PATH, theme, project name, then the
//! target directory. The first failure wins.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::app::archive;
use crate::app::models::{InstallRequest, ThemeName};
use crate::app::tools::CommandProbe;
use crate::constants::tools;
use crate::errors::{PreconditionError, PreconditionResult};

/// Run every precondition and return the validated theme
///
/// # Errors
///
/// Returns the first failing [`PreconditionError`].
pub fn check(
    request: &InstallRequest,
    allow_list: &[String],
    probe: &impl CommandProbe,
) -> PreconditionResult<ThemeName> {
    archive::probe_support()
        .map_err(|reason| PreconditionError::ArchiveSupportMissing { reason })?;

    if !probe.is_available(tools::YARN) {
        return Err(PreconditionError::MissingTool {
            tool: tools::YARN.to_string(),
            hint: tools::YARN_INSTALL_HINT.to_string(),
        });
    }

    let theme = ThemeName::parse(request.theme_name.as_deref(), allow_list)?;
    request.validate_project_name()?;

    if !request.targets_working_directory() {
        ensure_target_free(&request.target_directory())?;
    }

    debug!("Preconditions passed for theme {}", theme);
    Ok(theme)
}

/// The target must not exist in any form
fn ensure_target_free(target: &Path) -> PreconditionResult<()> {
    match std::fs::symlink_metadata(target) {
        Ok(_) => Err(PreconditionError::TargetExists {
            path: target.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PreconditionError::TargetUnreadable {
            path: target.to_path_buf(),
            source,
        }),
    }
}
