//! Pipeline step descriptors
//!
//! Steps are data, not shell text. Commands carry their program and argv
//! separately and filesystem work is described by paths relative to the
//! project root, so no user input is ever parsed by a shell.

use std::fmt;
use std::path::PathBuf;

/// One unit of work in the post-extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStep {
    /// Run an external program
    Command { program: String, args: Vec<String> },
    /// Delete files or directory trees; missing paths are ignored
    RemovePaths { paths: Vec<PathBuf> },
    /// Rename `from` to `to`; a missing source fails the step
    Move { from: PathBuf, to: PathBuf },
}

impl PipelineStep {
    /// Command step from a program and its arguments
    pub fn command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Removal step
    pub fn remove<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::RemovePaths {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Move step
    pub fn rename(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self::Move {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this step runs an external program
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Self::RemovePaths { paths } => {
                f.write_str("remove")?;
                for path in paths {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
            Self::Move { from, to } => {
                write!(f, "move {} -> {}", from.display(), to.display())
            }
        }
    }
}

/// Which child stream a chunk of output came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// A chunk of child output, normally one line including its newline
///
/// A trailing chunk without a newline is delivered as soon as it is read,
/// so prompts that wait on the same line still reach the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub bytes: Vec<u8>,
}

impl OutputLine {
    /// Lossy UTF-8 view of the chunk
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Exit status of a finished step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
}

impl StepStatus {
    /// Status of a step that completed without a child process
    pub const SUCCESS: StepStatus = StepStatus { code: Some(0) };

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
