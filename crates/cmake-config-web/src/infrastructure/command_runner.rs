//! Child process execution for cmake.
//!
//! Both invocation modes share one producer:
//!
//! ```text
//!   child stdout ─┐
//!                 ├──► one OS pipe ──► reader (blocking pool) ──► mpsc (bounded) ──► consumer
//!   child stderr ─┘                                                   ▲
//!                                                                     │
//!   supervisor: join reader, wait() ──────────────────────────────────┘  OutputEvent::Exited
//! ```
//!
//! stdout and stderr share a single pipe, so lines arrive in exactly the
//! order the child wrote them.
//!
//! - Configure mode drains the channel into one text blob.
//! - Build mode hands the receiver to the HTTP layer, which forwards each
//!   line to the browser as soon as it arrives.
//!
//! The channel is bounded, so a slow consumer slows the reader down.  If
//! the consumer goes away entirely the reader keeps draining the pipe and
//! discards the text, so the child never stalls on a full pipe.  The child
//! is never killed: a started build always runs to completion.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::{build_args, configure_args};
use crate::domain::OptionSet;

/// Lines buffered between the output reader and the consumer.
pub const OUTPUT_CHANNEL_CAPACITY: usize = 128;

/// The child process could not be started.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The shared stdout/stderr pipe could not be created.
    #[error("failed to create output pipe for `{program}`: {source}")]
    Pipe {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start `{program}` in {working_dir}: {source}")]
    Spawn {
        program: String,
        working_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `true` iff the exit code was zero.
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

/// One item produced while a child runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// A line of combined stdout/stderr, line terminator included.
    Line(String),
    /// Always the last event.
    Exited(ExitOutcome),
}

/// Result of a buffered (configure mode) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub success: bool,
    pub output: String,
}

/// Launches the build tool inside the build directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    working_dir: PathBuf,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Configure mode: `<program> <source_dir> -D<ID>=ON|OFF ...`, run to
    /// completion with all output captured.
    ///
    /// # Errors
    ///
    /// Returns a [`RunnerError`] if the process could not be started.  A
    /// non-zero exit is not an error; it is reported through
    /// [`CapturedOutput::success`].
    pub async fn configure(
        &self,
        source_dir: &Path,
        options: &OptionSet,
    ) -> Result<CapturedOutput, RunnerError> {
        self.run_captured(configure_args(source_dir, options)).await
    }

    /// Build mode: `<program> --build . --parallel`, streamed.
    ///
    /// # Errors
    ///
    /// Returns a [`RunnerError`] if the process could not be started.
    pub fn build(&self) -> Result<mpsc::Receiver<OutputEvent>, RunnerError> {
        self.spawn(build_args())
    }

    /// Runs `args` to completion and concatenates every output line.
    ///
    /// # Errors
    ///
    /// Returns a [`RunnerError`] if the process could not be started.
    pub async fn run_captured<I, S>(&self, args: I) -> Result<CapturedOutput, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut events = self.spawn(args)?;
        let mut output = String::new();
        let mut success = false;

        while let Some(event) = events.recv().await {
            match event {
                OutputEvent::Line(line) => output.push_str(&line),
                OutputEvent::Exited(outcome) => success = outcome.success,
            }
        }

        Ok(CapturedOutput { success, output })
    }

    /// Starts `args` and returns the receiving end of its output channel.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Pipe`] if the output pipe cannot be created and
    /// [`RunnerError::Spawn`] if the process could not be started.
    pub fn spawn<I, S>(&self, args: I) -> Result<mpsc::Receiver<OutputEvent>, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let pipe_error = |source: std::io::Error| RunnerError::Pipe {
            program: self.program.clone(),
            source,
        };
        let (reader, stdout_writer) = os_pipe::pipe().map_err(pipe_error)?;
        let stderr_writer = stdout_writer.try_clone().map_err(pipe_error)?;

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(stdout_writer)
            .stderr(stderr_writer);
        info!("running: {:?}", command.as_std());

        let spawned = command.spawn();
        // The command still owns the parent's copies of the write end; the
        // reader only sees EOF once they are closed.
        drop(command);
        let mut child = spawned.map_err(|source| RunnerError::Spawn {
            program: self.program.clone(),
            working_dir: self.working_dir.clone(),
            source,
        })?;

        let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        let reader_tx = tx.clone();
        let reader_task = tokio::task::spawn_blocking(move || forward_lines(reader, reader_tx));
        let program = self.program.clone();

        tokio::spawn(async move {
            // Drain the pipe before waiting so no output is lost.
            if let Err(e) = reader_task.await {
                warn!("`{program}` output reader failed: {e}");
            }

            let outcome = match child.wait().await {
                Ok(status) => ExitOutcome {
                    success: status.success(),
                    code: status.code(),
                },
                Err(e) => {
                    warn!("failed to wait for `{program}`: {e}");
                    ExitOutcome {
                        success: false,
                        code: None,
                    }
                }
            };
            info!("`{program}` exited (code {:?})", outcome.code);

            // The consumer may already be gone; nothing left to tell it.
            let _ = tx.send(OutputEvent::Exited(outcome)).await;
        });

        Ok(rx)
    }
}

/// Reads `pipe` line by line into `tx` until EOF.  Runs on the blocking pool.
///
/// Invalid UTF-8 is replaced rather than rejected.  Once the receiver is
/// dropped the remaining output is read and discarded.
fn forward_lines<R: Read>(pipe: R, tx: mpsc::Sender<OutputEvent>) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut consumer_gone = false;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if consumer_gone {
                    continue;
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.blocking_send(OutputEvent::Line(line)).is_err() {
                    debug!("output consumer dropped; discarding remaining output");
                    consumer_gone = true;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("error reading child output: {e}");
                break;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
