//! Command-line argument parsing for the MyLar installer
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// MyLar Installer - scaffold a new MyLar application
#[derive(Parser, Debug)]
#[command(
    name = "mylar",
    version,
    about = "Create a new MyLar application from the latest release",
    long_about = "Downloads the latest MyLar release, extracts it, installs PHP and JS dependencies,
applies the selected admin theme and builds the front-end assets."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new application
    New(NewArgs),
}

/// Arguments for the new command
#[derive(Args, Debug, Clone, Default)]
pub struct NewArgs {
    /// Project directory to create (defaults to the current directory)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Admin theme to apply
    #[arg(value_name = "THEME")]
    pub theme: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl GlobalArgs {
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.very_verbose {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Whether any verbosity flag was given explicitly
    pub fn has_level_flag(&self) -> bool {
        self.quiet || self.verbose || self.very_verbose
    }

    /// Level filter for the subscriber: an explicit flag wins over the
    /// configured level, which wins over the flag defaults
    pub fn effective_log_level(&self, configured: Option<&str>) -> String {
        match configured {
            Some(level) if !self.has_level_flag() => level.to_lowercase(),
            _ => self.log_level().to_string().to_lowercase(),
        }
    }
}
