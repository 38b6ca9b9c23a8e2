//! Composer invocation discovery
//!
//! A `composer.phar` in the working directory wins over a system-wide
//! `composer`. The phar is run through the `php` interpreter found on PATH.

use std::path::Path;

use crate::app::pipeline::PipelineStep;
use crate::app::tools::CommandProbe;
use crate::constants::{files, tools};

/// How to invoke the PHP dependency manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerCommand {
    program: String,
    leading_args: Vec<String>,
}

impl ComposerCommand {
    /// Pick the composer invocation for `working_directory`
    pub fn discover(working_directory: &Path, probe: &impl CommandProbe) -> Self {
        let phar = working_directory.join(files::COMPOSER_PHAR);
        if phar.is_file() {
            let php = probe
                .resolve(tools::PHP)
                .filter(|path| !path.as_os_str().is_empty())
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_else(|| tools::PHP.to_string());

            tracing::debug!("Using local {} via {}", phar.display(), php);
            return Self {
                program: php,
                leading_args: vec![phar.to_string_lossy().into_owned()],
            };
        }

        Self::system()
    }

    /// Bare `composer` from PATH
    pub fn system() -> Self {
        Self {
            program: tools::COMPOSER.to_string(),
            leading_args: Vec::new(),
        }
    }

    /// Composer step running `args`
    pub fn step<I, S>(&self, args: I) -> PipelineStep
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let all_args = self
            .leading_args
            .iter()
            .cloned()
            .chain(args.into_iter().map(Into::into));
        PipelineStep::command(self.program.clone(), all_args)
    }
}
