//! MCP Tool definitions and handlers
//!
//! Defines the git tools and the registry the server is started with.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{RegistryError, ToolError};
use crate::git::GitClient;
use crate::mcp::registry::{RegistryBuilder, ToolDescriptor, ToolHandler, ToolRegistry};
use crate::mcp::schema::{FieldSpec, InputSchema};

pub const GIT_STATUS: &str = "git-status";
pub const GIT_LOG: &str = "git-log";

/// Default number of commits returned by `git-log`
pub const DEFAULT_LOG_COUNT: u64 = 10;

const CLEAN_TREE: &str = "Working directory clean - no changes detected";
const NO_REMOTES: &str = "No remotes configured";
const NO_COMMITS: &str = "No commits found";
const DETACHED_HEAD: &str = "(detached HEAD)";

/// Build the registry holding every git tool
pub fn builtin_registry(git: Arc<GitClient>) -> Result<ToolRegistry, RegistryError> {
    Ok(RegistryBuilder::new()
        .register(Arc::new(GitStatusTool::new(git.clone())))?
        .register(Arc::new(GitLogTool::new(git)))?
        .build())
}

/// Decode normalized arguments into a tool's typed argument record
fn typed_args<T: for<'de> Deserialize<'de>>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::invalid_argument("arguments", e.to_string()))
}

// ==================== git-status ====================

#[derive(Debug, Deserialize)]
struct GitStatusArgs {
    directory: Option<PathBuf>,
}

/// Reports working tree status, current branch and remotes
pub struct GitStatusTool {
    git: Arc<GitClient>,
    descriptor: ToolDescriptor,
}

impl GitStatusTool {
    pub fn new(git: Arc<GitClient>) -> Self {
        Self {
            git,
            descriptor: ToolDescriptor {
                name: GIT_STATUS,
                description: "Get the current git status of the repository",
                input_schema: InputSchema::new(vec![FieldSpec::string(
                    "directory",
                    "Directory path to check git status (defaults to current directory)",
                )]),
            },
        }
    }
}

#[async_trait]
impl ToolHandler for GitStatusTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, args: Map<String, Value>) -> Result<String, ToolError> {
        let args: GitStatusArgs = typed_args(args)?;
        let external = |source| ToolError::External {
            operation: "git status",
            source,
        };

        let dir = self
            .git
            .resolve_directory(args.directory.as_deref())
            .map_err(external)?;

        // Sequential on purpose: output order is status, branch, remotes.
        let status = self.git.status_porcelain(&dir).await.map_err(external)?;
        let branch = self.git.current_branch(&dir).await.map_err(external)?;
        let remotes = self.git.remotes(&dir).await.map_err(external)?;

        Ok(format_status(&dir, &branch, &status, &remotes))
    }
}

fn format_status(dir: &std::path::Path, branch: &str, status: &str, remotes: &str) -> String {
    let branch = if branch.is_empty() { DETACHED_HEAD } else { branch };

    let mut text = format!("Git Status for: {}\n", dir.display());
    text.push_str(&format!("Current branch: {}\n", branch));
    text.push_str("\nStatus:\n");

    if status.trim().is_empty() {
        text.push_str(CLEAN_TREE);
        text.push('\n');
    } else {
        text.push_str(&with_trailing_newline(status));
    }

    text.push_str("\nRemotes:\n");
    if remotes.trim().is_empty() {
        text.push_str(NO_REMOTES);
        text.push('\n');
    } else {
        text.push_str(&with_trailing_newline(remotes));
    }

    text
}

// ==================== git-log ====================

#[derive(Debug, Deserialize)]
struct GitLogArgs {
    directory: Option<PathBuf>,
    count: u64,
}

/// Reports the most recent commits in one-line form
pub struct GitLogTool {
    git: Arc<GitClient>,
    descriptor: ToolDescriptor,
}

impl GitLogTool {
    pub fn new(git: Arc<GitClient>) -> Self {
        Self {
            git,
            descriptor: ToolDescriptor {
                name: GIT_LOG,
                description: "Get recent git commit history",
                input_schema: InputSchema::new(vec![
                    FieldSpec::string(
                        "directory",
                        "Directory path to check git log (defaults to current directory)",
                    ),
                    FieldSpec::integer(
                        "count",
                        "Number of recent commits to show (default: 10)",
                    )
                    .default_value(DEFAULT_LOG_COUNT)
                    .minimum(0),
                ]),
            },
        }
    }
}

#[async_trait]
impl ToolHandler for GitLogTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, args: Map<String, Value>) -> Result<String, ToolError> {
        let args: GitLogArgs = typed_args(args)?;
        let external = |source| ToolError::External {
            operation: "git log",
            source,
        };

        let dir = self
            .git
            .resolve_directory(args.directory.as_deref())
            .map_err(external)?;
        let log = self.git.log_oneline(&dir, args.count).await.map_err(external)?;

        Ok(format_log(args.count, &log))
    }
}

fn format_log(count: u64, log: &str) -> String {
    let body = if count == 0 {
        String::new()
    } else if log.trim().is_empty() {
        format!("{}\n", NO_COMMITS)
    } else {
        with_trailing_newline(log)
    };
    format!("Recent Git Commits ({} most recent):\n\n{}", count, body)
}

fn with_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}
