//! Post-extraction pipeline
//!
//! Dependency installation, lifecycle hooks, theme layout and the asset
//! build are modelled as an ordered list of [`PipelineStep`]s and executed
//! by [`PipelineRunner`], which stops at the first failure.

pub mod composer;
pub mod executor;
pub mod layout;
pub mod runner;
pub mod step;
pub mod terminal;

pub use composer::ComposerCommand;
pub use executor::{apply_file_step, ProcessExecutor, StepExecutor, StepFailure};
pub use layout::theme_layout_steps;
pub use runner::PipelineRunner;
pub use step::{OutputLine, OutputStream, PipelineStep, StepStatus};
pub use terminal::{ControllingTerminal, NonInteractive, TerminalCapability};

use crate::app::models::ThemeName;
use crate::constants::tools;

/// Full ordered pipeline for `theme`
///
/// Composer install without scripts, the two lifecycle hooks, the JS
/// install, the five layout steps and finally the development build.
pub fn compose_pipeline(composer: &ComposerCommand, theme: &ThemeName) -> Vec<PipelineStep> {
    let mut steps = vec![
        composer.step(["install", "--no-scripts"]),
        composer.step(["run-script", "post-install-cmd"]),
        composer.step(["run-script", "post-create-project-cmd"]),
        PipelineStep::command(tools::YARN, ["install"]),
    ];
    steps.extend(theme_layout_steps(theme));
    steps.push(PipelineStep::command(tools::YARN, ["run", "dev"]));
    steps
}
