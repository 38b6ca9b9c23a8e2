//! Interactive terminal attachment
//!
//! On POSIX-like hosts with a readable `/dev/tty`, the controlling terminal
//! becomes the child's stdin so prompts from post-install hooks can be
//! answered. Everywhere else children run with no input.

use std::fs::File;

/// Source of an interactive input handle for child processes
pub trait TerminalCapability {
    /// A fresh handle to the interactive terminal, if one can be attached
    fn interactive_input(&self) -> Option<File>;
}

/// The controlling terminal of the installer process
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllingTerminal;

impl ControllingTerminal {
    const DEVICE: &'static str = "/dev/tty";
}

impl TerminalCapability for ControllingTerminal {
    fn interactive_input(&self) -> Option<File> {
        if cfg!(windows) {
            return None;
        }

        match File::open(Self::DEVICE) {
            Ok(tty) => Some(tty),
            Err(e) => {
                tracing::debug!("{} not usable, running non-interactively: {}", Self::DEVICE, e);
                None
            }
        }
    }
}

/// Never attaches a terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl TerminalCapability for NonInteractive {
    fn interactive_input(&self) -> Option<File> {
        None
    }
}
