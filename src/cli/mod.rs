//! Command-line interface components
//!
//! This module contains CLI-specific code for the MyLar installer,
//! including argument parsing, progress display, and the command handler.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, GlobalArgs, NewArgs};
pub use commands::handle_new;
pub use progress::{ConsoleObserver, ProgressConfig};
