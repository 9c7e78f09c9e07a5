//! Git client
//!
//! Thin typed layer over the git executable. Every method runs one fixed
//! subcommand through a [`CommandRunner`] and returns its stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ExecError, GitError};
use crate::exec::{CommandRunner, Invocation};

/// Git client bound to a runner and a binary
pub struct GitClient {
    runner: Arc<dyn CommandRunner>,
    git_bin: String,
    timeout: Duration,
    default_directory: Option<PathBuf>,
}

impl GitClient {
    /// Create a new git client
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            git_bin: config.git_bin.clone(),
            timeout: config.timeout,
            default_directory: config.default_directory.clone(),
        }
    }

    /// Resolve the directory a call should run in. A blank request counts
    /// as no request.
    pub fn resolve_directory(&self, requested: Option<&Path>) -> Result<PathBuf, GitError> {
        let requested = requested.filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty());
        if let Some(dir) = requested.or(self.default_directory.as_deref()) {
            return Ok(dir.to_path_buf());
        }
        std::env::current_dir().map_err(|_| {
            GitError::Exec(ExecError::WorkingDirectory {
                path: PathBuf::from("."),
            })
        })
    }

    /// `git status --porcelain=v1`
    pub async fn status_porcelain(&self, dir: &Path) -> Result<String, GitError> {
        self.run(dir, &["status", "--porcelain=v1"]).await
    }

    /// `git branch --show-current`, trimmed. Empty on a detached HEAD.
    pub async fn current_branch(&self, dir: &Path) -> Result<String, GitError> {
        let out = self.run(dir, &["branch", "--show-current"]).await?;
        Ok(out.trim().to_string())
    }

    /// `git remote -v`
    pub async fn remotes(&self, dir: &Path) -> Result<String, GitError> {
        self.run(dir, &["remote", "-v"]).await
    }

    /// `git log --oneline -n <count>`
    pub async fn log_oneline(&self, dir: &Path, count: u64) -> Result<String, GitError> {
        let count = count.to_string();
        self.run(dir, &["log", "--oneline", "-n", &count]).await
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String, GitError> {
        let invocation = Invocation::new(self.git_bin.as_str(), args.iter().copied(), dir)
            .with_timeout(self.timeout);

        let result = self.runner.run(&invocation).await?;

        if result.timed_out {
            return Err(GitError::TimedOut {
                command: invocation.command_line(),
                timeout: self.timeout,
            });
        }

        if result.exit_code != 0 {
            tracing::debug!(
                command = %invocation.command_line(),
                exit_code = result.exit_code,
                "git exited with failure"
            );
            return Err(GitError::CommandFailed {
                command: invocation.command_line(),
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result.stdout)
    }
}
