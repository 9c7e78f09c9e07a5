//! Command execution
//!
//! Runs external programs to completion and hands back their buffered output.

pub mod process;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;

pub use process::ProcessRunner;

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run, resolved through `PATH` when not absolute
    pub program: String,

    /// Arguments passed verbatim
    pub args: Vec<String>,

    /// Directory the program runs in
    pub working_dir: PathBuf,

    /// Per-invocation timeout; the runner's default applies when `None`
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Create an invocation without an explicit timeout
    pub fn new<I, S>(program: impl Into<String>, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    /// Bound this invocation by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Human readable command line, used in logs and error text
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of a program that was started and waited on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,

    /// Exit code, or -1 when the process was terminated by a signal
    pub exit_code: i32,

    /// The process was killed because it exceeded its timeout
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Exited with status zero before the timeout
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Something that can run an [`Invocation`]
///
/// Implementations buffer all output and never retry.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<ExecutionResult, ExecError>;
}
