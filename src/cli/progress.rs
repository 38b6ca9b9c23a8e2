//! Console rendering of install progress
//!
//! Network and extraction stages show an indicatif spinner. Once the
//! pipeline starts the spinner is cleared and child output is written raw,
//! exactly as the child produced it, so prompts and colours survive.

use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::events::{InstallEvent, InstallObserver};
use crate::app::pipeline::{OutputLine, OutputStream};

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Animate a spinner while waiting on the network
    pub enable_spinner: bool,
    /// Print a banner before each pipeline step
    pub show_step_banners: bool,
    /// Spinner tick rate
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_spinner: true,
            show_step_banners: true,
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl ProgressConfig {
    /// Settings for `--quiet`: no spinner, no banners
    pub fn quiet() -> Self {
        Self {
            enable_spinner: false,
            show_step_banners: false,
            ..Self::default()
        }
    }
}

/// [`InstallObserver`] writing to the terminal
pub struct ConsoleObserver {
    config: ProgressConfig,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            spinner: None,
        }
    }

    fn set_status(&mut self, message: String) {
        if !self.config.enable_spinner {
            return;
        }

        let spinner = self.spinner.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.enable_steady_tick(self.config.tick_interval);
            spinner
        });
        spinner.set_message(message);
    }

    fn clear_status(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new(ProgressConfig::default())
    }
}

impl InstallObserver for ConsoleObserver {
    fn on_event(&mut self, event: &InstallEvent) {
        match event {
            InstallEvent::Creating { .. } => {
                println!("Creating application...");
                self.set_status("Looking up latest release".to_string());
            }
            InstallEvent::VersionResolved { version } => {
                self.set_status(format!("Latest release is {}", version));
            }
            InstallEvent::Downloading { url } => {
                self.set_status(format!("Downloading {}", url));
            }
            InstallEvent::Extracting { destination } => {
                self.set_status(format!("Extracting into {}", destination.display()));
            }
            InstallEvent::StepStarted { index, total, step } => {
                self.clear_status();
                if self.config.show_step_banners {
                    println!("==> [{}/{}] {}", index, total, step);
                }
            }
            InstallEvent::Completed { .. } => self.clear_status(),
        }
    }

    fn on_output(&mut self, line: &OutputLine) {
        let result = match line.stream {
            OutputStream::Stdout => write_raw(&mut io::stdout().lock(), &line.bytes),
            OutputStream::Stderr => write_raw(&mut io::stderr().lock(), &line.bytes),
        };

        if let Err(e) = result {
            tracing::debug!("Could not forward child output: {}", e);
        }
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        self.clear_status();
    }
}

fn write_raw(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}
