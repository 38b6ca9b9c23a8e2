//! Step execution
//!
//! [`ProcessExecutor`] runs command steps as child processes with piped
//! stdout/stderr and performs filesystem steps natively. Child output is
//! forwarded chunk by chunk while the executor waits for the exit status.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::app::pipeline::terminal::TerminalCapability;
use crate::app::pipeline::{OutputLine, OutputStream, PipelineStep, StepStatus};

/// Why a step could not produce an exit status
#[derive(Debug)]
pub enum StepFailure {
    /// Child process could not be started
    Spawn(io::Error),
    /// Native filesystem operation failed
    FileOperation(io::Error),
    /// Child output could not be read or the child could not be awaited
    Wait(io::Error),
}

/// Executes a single pipeline step inside a working directory
#[allow(async_fn_in_trait)]
pub trait StepExecutor {
    /// Run `step` with `working_dir` as its current directory
    ///
    /// `output` receives child output as it is produced.
    async fn execute(
        &self,
        step: &PipelineStep,
        working_dir: &Path,
        output: &mut dyn FnMut(&OutputLine),
    ) -> Result<StepStatus, StepFailure>;
}

/// Real executor: child processes plus native filesystem operations
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor<T> {
    terminal: T,
}

impl<T: TerminalCapability> ProcessExecutor<T> {
    pub fn new(terminal: T) -> Self {
        Self { terminal }
    }

    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        output: &mut dyn FnMut(&OutputLine),
    ) -> Result<StepStatus, StepFailure> {
        let mut command = Command::new(resolve_program(program));
        command
            .args(args)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match self.terminal.interactive_input() {
            Some(tty) => {
                tracing::debug!("Attaching interactive terminal to {}", program);
                command.stdin(Stdio::from(tty));
            }
            None => {
                command.stdin(Stdio::null());
            }
        }

        let mut child = command.spawn().map_err(StepFailure::Spawn)?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pumps = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            pumps.push(tokio::spawn(pump(stdout, OutputStream::Stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(tokio::spawn(pump(stderr, OutputStream::Stderr, tx.clone())));
        }
        drop(tx);

        while let Some(line) = rx.recv().await {
            output(&line);
        }

        for pump in pumps {
            match pump.await {
                Ok(result) => result.map_err(StepFailure::Wait)?,
                Err(e) => return Err(StepFailure::Wait(io::Error::new(io::ErrorKind::Other, e))),
            }
        }

        let status = child.wait().await.map_err(StepFailure::Wait)?;
        tracing::debug!("{} exited with {:?}", program, status.code());

        Ok(StepStatus {
            code: status.code(),
        })
    }
}

impl<T: TerminalCapability> StepExecutor for ProcessExecutor<T> {
    async fn execute(
        &self,
        step: &PipelineStep,
        working_dir: &Path,
        output: &mut dyn FnMut(&OutputLine),
    ) -> Result<StepStatus, StepFailure> {
        match step {
            PipelineStep::Command { program, args } => {
                self.run_command(program, args, working_dir, output).await
            }
            _ => apply_file_step(step, working_dir)
                .await
                .map(|()| StepStatus::SUCCESS)
                .map_err(StepFailure::FileOperation),
        }
    }
}

/// Perform a filesystem step relative to `working_dir`
///
/// Command steps are a no-op here.
pub async fn apply_file_step(step: &PipelineStep, working_dir: &Path) -> io::Result<()> {
    match step {
        PipelineStep::Command { .. } => Ok(()),
        PipelineStep::RemovePaths { paths } => {
            for path in paths {
                remove_path(&working_dir.join(path)).await?;
            }
            Ok(())
        }
        PipelineStep::Move { from, to } => {
            let from = working_dir.join(from);
            let to = working_dir.join(to);

            if let Some(parent) = to.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::rename(&from, &to).await.map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("cannot move {} to {}: {}", from.display(), to.display(), e),
                )
            })
        }
    }
}

async fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

/// Full path of `program` on PATH, or the name unchanged
///
/// Resolving up front lets Windows find `.cmd`/`.bat` shims.
fn resolve_program(program: &str) -> PathBuf {
    which::which(program).unwrap_or_else(|_| PathBuf::from(program))
}

/// Forward `reader` to `tx` one line at a time
///
/// A partial line is forwarded as soon as no more bytes are buffered, so a
/// prompt waiting for input on the same line is not held back.
async fn pump<R>(
    reader: R,
    stream: OutputStream,
    tx: mpsc::UnboundedSender<OutputLine>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }

        let take = available
            .iter()
            .position(|b| *b == b'\n')
            .map_or(available.len(), |newline| newline + 1);
        let line = OutputLine {
            stream,
            bytes: available[..take].to_vec(),
        };
        reader.consume(take);

        // Receiver gone means nobody is listening; keep draining so the child never blocks
        let _ = tx.send(line);
    }
}
