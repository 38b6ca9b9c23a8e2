//! External tool resolution
//!
//! Availability is decided by looking the program up on PATH. The program
//! itself is never executed during the check.

use std::path::PathBuf;

/// Answers whether a program name resolves to an executable
pub trait CommandProbe {
    /// Full path of `program`, if it resolves
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Whether `program` resolves to a non-empty path
    fn is_available(&self, program: &str) -> bool {
        self.resolve(program)
            .is_some_and(|path| !path.as_os_str().is_empty())
    }
}

/// Probe backed by the process PATH
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl CommandProbe for PathProbe {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => {
                tracing::debug!("Resolved {} to {}", program, path.display());
                Some(path)
            }
            Err(e) => {
                tracing::debug!("{} not found on PATH: {}", program, e);
                None
            }
        }
    }
}
