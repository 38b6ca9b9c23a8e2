//! Data models for a single installer run
//!
//! Everything here is built once from caller input and never mutated.
//! Nothing persists between runs.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::app::archive;
use crate::app::hash::ArchiveToken;
use crate::constants::files;
use crate::errors::{PreconditionError, PreconditionResult};

/// Caller input for one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Sub-directory to scaffold into; `None` scaffolds into the working directory
    pub project_name: Option<String>,
    /// Raw theme selector as given on the command line
    pub theme_name: Option<String>,
    /// Absolute directory the installer was started from
    pub working_directory: PathBuf,
}

impl InstallRequest {
    /// Create a new install request
    pub fn new(
        project_name: Option<String>,
        theme_name: Option<String>,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name,
            theme_name,
            working_directory: working_directory.into(),
        }
    }

    /// Directory the application is materialized into
    ///
    /// `working_directory/project_name` when a name is given, otherwise the
    /// working directory itself.
    pub fn target_directory(&self) -> PathBuf {
        match &self.project_name {
            Some(name) => self.working_directory.join(name),
            None => self.working_directory.clone(),
        }
    }

    /// Whether the run scaffolds straight into the working directory
    pub fn targets_working_directory(&self) -> bool {
        self.target_directory() == self.working_directory
    }

    /// Reject project names that would leave the working directory
    ///
    /// The name must be a non-empty relative path made only of normal
    /// components.
    pub fn validate_project_name(&self) -> PreconditionResult<()> {
        let Some(name) = &self.project_name else {
            return Ok(());
        };

        let invalid = |reason: &str| PreconditionError::InvalidProjectName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }

        for component in Path::new(name).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("'..' is not allowed")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("must be a relative path"))
                }
            }
        }

        Ok(())
    }
}

/// A theme selector checked against the configured allow-list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeName(String);

impl ThemeName {
    /// Validate a raw theme selector against the allow-list
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::ThemeNotGiven` when no theme was supplied
    /// and `PreconditionError::InvalidTheme` when it is not in the list.
    pub fn parse(raw: Option<&str>, allow_list: &[String]) -> PreconditionResult<Self> {
        let available = allow_list.join(", ");

        let Some(raw) = raw else {
            return Err(PreconditionError::ThemeNotGiven { available });
        };

        if allow_list.iter().any(|theme| theme == raw) && is_simple_identifier(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(PreconditionError::InvalidTheme {
                theme: raw.to_string(),
                available,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True for names made of ASCII letters, digits, `-` and `_`
pub fn is_simple_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Opaque release tag obtained from the release index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of the downloaded release archive, unique per run
///
/// Written once by the fetcher, read once by the extractor. The file is
/// removed when the value is dropped, so a failed or cancelled run never
/// leaves it behind.
#[derive(Debug, PartialEq, Eq)]
pub struct TempArchivePath(PathBuf);

impl TempArchivePath {
    /// Generate a fresh archive path inside `directory`
    pub fn generate(directory: &Path) -> Self {
        let token = ArchiveToken::generate();
        let file_name = format!(
            "{}{}.{}",
            files::TEMP_ARCHIVE_PREFIX,
            token,
            files::TEMP_ARCHIVE_EXTENSION
        );
        Self(directory.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for TempArchivePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempArchivePath {
    fn drop(&mut self) {
        archive::clean_up(&self.0);
    }
}
