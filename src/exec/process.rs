//! Child process runner backed by `tokio::process`

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time;

use crate::error::ExecError;
use crate::exec::{CommandRunner, ExecutionResult, Invocation};

/// How long a killed process gets to actually exit
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Runs invocations as real child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    default_timeout: Duration,
}

impl ProcessRunner {
    /// Create a runner that bounds every invocation by `default_timeout`
    /// unless the invocation carries its own
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ExecutionResult, ExecError> {
        if !invocation.working_dir.is_dir() {
            return Err(ExecError::WorkingDirectory {
                path: invocation.working_dir.clone(),
            });
        }

        let timeout = invocation.timeout.unwrap_or(self.default_timeout);
        let program = invocation.program.clone();

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;

        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.working_dir.display(),
            "spawned process"
        );

        let stdout_task = tokio::spawn(read_all(child.stdout.take()));
        let stderr_task = tokio::spawn(read_all(child.stderr.take()));

        let (status, timed_out) = match time::timeout(timeout, child.wait()).await {
            Ok(res) => (
                res.map_err(|source| ExecError::Wait {
                    program: program.clone(),
                    source,
                })?,
                false,
            ),
            Err(_) => {
                tracing::warn!(
                    command = %invocation.command_line(),
                    timeout_ms = timeout.as_millis() as u64,
                    "process timed out, killing"
                );
                // An error here means the process already exited.
                let _ = child.start_kill();
                match time::timeout(KILL_GRACE, child.wait()).await {
                    Ok(res) => (
                        res.map_err(|source| ExecError::Wait {
                            program: program.clone(),
                            source,
                        })?,
                        true,
                    ),
                    Err(_) => return Err(ExecError::Unkillable { program }),
                }
            }
        };

        // Grandchildren may keep the pipes open after a kill.
        let (stdout, stderr) = if timed_out {
            (
                time::timeout(KILL_GRACE, stdout_task).await.ok(),
                time::timeout(KILL_GRACE, stderr_task).await.ok(),
            )
        } else {
            (Some(stdout_task.await), Some(stderr_task.await))
        };
        let stdout = stdout.and_then(|r| r.ok()).unwrap_or_default();
        let stderr = stderr.and_then(|r| r.ok()).unwrap_or_default();

        let exit_code = status.code().unwrap_or(-1);
        tracing::debug!(command = %invocation.command_line(), exit_code, timed_out, "process exited");

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code,
            timed_out,
        })
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        // Partial output is still worth reporting.
        let _ = reader.read_to_end(&mut buf).await;
    }
    buf
}
