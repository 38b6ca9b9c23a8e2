//! Error types for the MyLar installer
//!
//! One enum per installation stage. Every error is fatal to the run; the
//! top-level [`AppError`] only exists to carry the stage error up to `main`
//! where it is rendered and turned into an exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Checks that run before any network or filesystem mutation
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// Zip support could not be exercised in this build
    #[error("The zip archive support is not available: {reason}")]
    ArchiveSupportMissing { reason: String },

    /// A required external tool is not resolvable on PATH
    #[error("Required tool '{tool}' was not found on PATH. {hint}")]
    MissingTool { tool: String, hint: String },

    /// No theme argument was supplied
    #[error("No theme given. Available themes: {available}")]
    ThemeNotGiven { available: String },

    /// Theme is not part of the allow-list
    #[error("Theme '{theme}' does not exist. Available themes: {available}")]
    InvalidTheme { theme: String, available: String },

    /// Project name would escape the working directory
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Target path is already taken
    #[error("Application already exists at {path}")]
    TargetExists { path: PathBuf },

    /// Target path could not be inspected
    #[error("Cannot inspect target directory {path}")]
    TargetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transport failures talking to the release host
#[derive(Error, Debug)]
pub enum NetworkError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Server error for {url}: HTTP {status}")]
    ServerError { url: String, status: u16 },

    /// Client could not be constructed
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// Malformed release-list responses
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not a JSON array of objects
    #[error("Release list is not valid JSON")]
    Json(#[from] serde_json::Error),

    /// Upstream has not published any release yet
    #[error("Release list is empty")]
    EmptyReleaseList,

    /// Most recent release has no usable `tag_name`
    #[error("Latest release has no 'tag_name' field")]
    MissingTagName,

    /// Tag cannot be used as a single URL path segment
    #[error("Release tag '{tag}' cannot be used in a download URL")]
    InvalidTag { tag: String },

    /// Substituted template is not a valid URL
    #[error("Invalid download URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Archive open/extract failures
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// File is not a readable zip archive
    #[error("Cannot open archive {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry could not be written to the target directory
    #[error("Failed to extract archive {path} into {destination}")]
    Extract {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Extraction task died before reporting a result
    #[error("Extraction task did not complete: {reason}")]
    TaskFailed { reason: String },
}

/// Local file writes owned by the installer
#[derive(Error, Debug)]
pub enum IoError {
    /// Downloaded archive could not be written
    #[error("Failed to write temporary archive {path}")]
    TempFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target directory could not be created
    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Working directory could not be determined
    #[error("Cannot determine the current working directory")]
    WorkingDirectory(#[source] std::io::Error),
}

/// Failures inside the post-extraction pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Step exited with a non-zero status
    #[error("Step {index} ({step}) failed with {}", describe_code(.code))]
    StepFailed {
        index: usize,
        step: String,
        code: Option<i32>,
    },

    /// Process could not be started
    #[error("Step {index} ({step}) could not be started")]
    Spawn {
        index: usize,
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem step failed
    #[error("Step {index} ({step}) failed")]
    FileOperation {
        index: usize,
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading child output or waiting on the child failed
    #[error("Lost contact with step {index} ({step})")]
    Wait {
        index: usize,
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipeline did not finish in time
    #[error("Pipeline timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Run aborted by the user
    #[error("Installation interrupted")]
    Interrupted,
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Precondition(_) => "precondition",
            AppError::Network(_) => "network",
            AppError::Parse(_) => "parse",
            AppError::Archive(_) => "archive",
            AppError::Io(_) => "io",
            AppError::Pipeline(_) => "pipeline",
            AppError::Config(_) => "config",
            AppError::Interrupted => "interrupted",
        }
    }

    /// Process exit status for this error
    ///
    /// A failing pipeline step hands its own exit code through; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Pipeline(PipelineError::StepFailed {
                code: Some(code), ..
            }) if *code != 0 => *code,
            AppError::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

pub type PreconditionResult<T> = std::result::Result<T, PreconditionError>;

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

pub type ParseResult<T> = std::result::Result<T, ParseError>;

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = AppError::from(PreconditionError::TargetExists {
            path: PathBuf::from("/tmp/demo"),
        });
        assert_eq!(err.category(), "precondition");
        assert_eq!(err.exit_code(), 1);

        let err = AppError::from(ParseError::EmptyReleaseList);
        assert_eq!(err.category(), "parse");
    }

    #[test]
    fn test_step_exit_code_propagates() {
        let err = AppError::from(PipelineError::StepFailed {
            index: 1,
            step: "composer install --no-scripts".to_string(),
            code: Some(3),
        });
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.to_string(),
            "Step 1 (composer install --no-scripts) failed with exit code 3"
        );

        let signalled = AppError::from(PipelineError::StepFailed {
            index: 4,
            step: "yarn install".to_string(),
            code: None,
        });
        assert_eq!(signalled.exit_code(), 1);
        assert!(signalled.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_invalid_theme_message_lists_available() {
        let err = PreconditionError::InvalidTheme {
            theme: "bogus".to_string(),
            available: "flatlab, lte".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Theme 'bogus' does not exist. Available themes: flatlab, lte"
        );
    }
}
