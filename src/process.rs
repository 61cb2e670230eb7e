//! # Process Runner
//!
//! Every external program repo-watch launches (`git`, the configured editor,
//! arbitrary `exec` commands) goes through the [`ProcessRunner`] trait. The
//! trait exists so the batch engine and the actions can be exercised in tests
//! with a recording mock instead of real processes, in the same way the
//! repository layer of a larger tool would mock its git operations.
//!
//! ## Output modes
//!
//! - [`OutputMode::Capture`]: stdout and stderr are buffered. Stdout is
//!   returned on success; stderr becomes the failure detail.
//! - [`OutputMode::Stream`]: stdout and stderr are piped and forwarded line
//!   by line as they arrive. Each forwarded line is written with a single
//!   locked write, so two concurrent repositories never interleave partial
//!   lines. An optional prefix tags the originating repository. The last
//!   few stderr lines become the failure detail.
//! - [`OutputMode::Inherit`]: the child gets the terminal. Used for editors
//!   and other interactive programs. Never subject to the timeout.
//!
//! ## Failures
//!
//! Launch errors, non-zero exits, signals and timeouts are all normalized
//! into one [`ExitFailure`] value. A non-zero exit is a reportable outcome,
//! never a panic.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

/// How often a timed wait polls the child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Streamed stderr lines kept as the failure detail.
const STDERR_TAIL_LINES: usize = 5;

/// A program, its arguments and the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Run `command_line` through the platform shell.
    pub fn shell(command_line: &str) -> Self {
        if cfg!(windows) {
            Self::new("cmd").args(["/C", command_line])
        } else {
            Self::new("sh").args(["-c", command_line])
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Where a child's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Buffer stdout/stderr; stdout is returned.
    Capture,
    /// Forward output line by line while the process runs.
    Stream {
        /// Prepended to every forwarded line, e.g. `[api] `.
        prefix: Option<String>,
        /// Send the child's stdout to our stderr. Keeps stdout clean for
        /// structured output.
        stdout_to_stderr: bool,
    },
    /// Hand the terminal to the child.
    Inherit,
}

impl OutputMode {
    pub fn stream() -> Self {
        OutputMode::Stream {
            prefix: None,
            stdout_to_stderr: false,
        }
    }
}

/// Why an external process did not succeed.
#[derive(Debug, Error)]
pub enum FailureKind {
    #[error("could not be started: {0}")]
    Launch(#[source] io::Error),
    #[error("exited with status {0}")]
    ExitCode(i32),
    #[error("was terminated by a signal")]
    Signal,
    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("could not be waited on: {0}")]
    Wait(#[source] io::Error),
}

/// A failed external process, normalized.
#[derive(Debug, Error)]
#[error("`{command}` {kind}{}", if detail.is_empty() { String::new() } else { format!(": {}", detail) })]
pub struct ExitFailure {
    /// The command line as displayed to the user.
    pub command: String,
    pub kind: FailureKind,
    /// Captured stderr, trimmed. Empty unless the output was captured.
    pub detail: String,
}

impl ExitFailure {
    pub fn new(command: &CommandSpec, kind: FailureKind) -> Self {
        Self {
            command: command.to_string(),
            kind,
            detail: String::new(),
        }
    }

    /// The process exit code, when it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self.kind {
            FailureKind::ExitCode(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, FailureKind::TimedOut(_))
    }
}

/// Runs external commands. Implementations must be shareable across the
/// dispatcher's worker threads.
pub trait ProcessRunner: Send + Sync {
    /// Run `command` to completion.
    ///
    /// Returns captured stdout in [`OutputMode::Capture`] and an empty string
    /// otherwise.
    fn run(&self, command: &CommandSpec, mode: &OutputMode) -> Result<String, ExitFailure>;
}

/// The real runner, backed by `std::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A runner that kills non-interactive processes after `timeout`.
    /// `None` waits forever.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn build(command: &CommandSpec) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn run_inherit(&self, command: &CommandSpec) -> Result<String, ExitFailure> {
        let status = Self::build(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExitFailure::new(command, FailureKind::Launch(e)))?;
        check_status(command, status)?;
        Ok(String::new())
    }

    fn run_capture(&self, command: &CommandSpec) -> Result<String, ExitFailure> {
        let mut child = Self::build(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExitFailure::new(command, FailureKind::Launch(e)))?;

        let stdout = child.stdout.take().map(collect);
        let stderr = child.stderr.take().map(collect);

        let status = self.wait(command, &mut child)?;
        let stdout = join_bytes(stdout);
        let stderr = join_bytes(stderr);

        if let Err(mut failure) = check_status(command, status) {
            failure.detail = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(failure);
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn run_stream(
        &self,
        command: &CommandSpec,
        prefix: Option<&str>,
        stdout_to_stderr: bool,
    ) -> Result<String, ExitFailure> {
        let mut child = Self::build(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExitFailure::new(command, FailureKind::Launch(e)))?;

        let prefix = prefix.unwrap_or_default().to_string();
        let stdout = child
            .stdout
            .take()
            .map(|pipe| forward(pipe, prefix.clone(), stdout_to_stderr, 0));
        let stderr = child
            .stderr
            .take()
            .map(|pipe| forward(pipe, prefix.clone(), true, STDERR_TAIL_LINES));

        let status = self.wait(command, &mut child)?;
        join_tail(stdout);
        let tail = join_tail(stderr);

        if let Err(mut failure) = check_status(command, status) {
            failure.detail = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(failure);
        }
        Ok(String::new())
    }

    /// Wait for `child`, killing it once the timeout elapses.
    ///
    /// Reader threads are not joined on timeout: a grandchild may still hold
    /// the pipes open.
    fn wait(&self, command: &CommandSpec, child: &mut Child) -> Result<ExitStatus, ExitFailure> {
        let Some(timeout) = self.timeout else {
            return child
                .wait()
                .map_err(|e| ExitFailure::new(command, FailureKind::Wait(e)));
        };

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => return Err(ExitFailure::new(command, FailureKind::Wait(e))),
            }
            if Instant::now() >= deadline {
                debug!("Killing `{}` after {}s", command, timeout.as_secs());
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExitFailure::new(command, FailureKind::TimedOut(timeout)));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, mode: &OutputMode) -> Result<String, ExitFailure> {
        debug!("Running `{}` in {:?}", command, command.cwd);
        match mode {
            OutputMode::Capture => self.run_capture(command),
            OutputMode::Stream {
                prefix,
                stdout_to_stderr,
            } => self.run_stream(command, prefix.as_deref(), *stdout_to_stderr),
            OutputMode::Inherit => self.run_inherit(command),
        }
    }
}

fn check_status(command: &CommandSpec, status: ExitStatus) -> Result<(), ExitFailure> {
    if status.success() {
        return Ok(());
    }
    let kind = match status.code() {
        Some(code) => FailureKind::ExitCode(code),
        None => FailureKind::Signal,
    };
    Err(ExitFailure::new(command, kind))
}

fn collect<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_bytes(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Forward `pipe` line by line, returning the last `keep` non-blank lines.
fn forward<R: Read + Send + 'static>(
    pipe: R,
    prefix: String,
    to_stderr: bool,
    keep: usize,
) -> JoinHandle<VecDeque<String>> {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        let mut tail = VecDeque::with_capacity(keep);
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    write_line(&prefix, line, to_stderr);
                    if keep > 0 && !line.trim().is_empty() {
                        if tail.len() == keep {
                            tail.pop_front();
                        }
                        tail.push_back(line.trim().to_string());
                    }
                }
            }
        }
        tail
    })
}

fn join_tail(handle: Option<JoinHandle<VecDeque<String>>>) -> VecDeque<String> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// One locked write per line.
fn write_line(prefix: &str, line: &str, to_stderr: bool) {
    let text = format!("{}{}\n", prefix, line);
    if to_stderr {
        let _ = io::stderr().lock().write_all(text.as_bytes());
    } else {
        let mut out = io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}
