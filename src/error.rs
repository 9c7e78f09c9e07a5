//! Error types for the Git Status MCP Server
//!
//! Recoverable conditions (bad arguments, failing git invocations) are turned
//! into error envelopes by the dispatcher. Protocol and transport errors are
//! reported at the JSON-RPC level or terminate the process.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the Git Status MCP Server
#[derive(Error, Debug)]
pub enum GitMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Default directory does not exist: {path}")]
    DirNotFound { path: String },
}

/// Tool registration errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },
}

/// Failures of the command executor itself (the process never produced an
/// exit status we can report)
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not terminate after being killed")]
    Unkillable { program: String },

    #[error("working directory is not accessible: {}", .path.display())]
    WorkingDirectory { path: PathBuf },
}

/// Errors from running git against a repository
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Command failed: {command} (exit code {exit_code})\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Command timed out after {}ms: {command}", .timeout.as_millis())]
    TimedOut { command: String, timeout: Duration },

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Errors produced while running a single tool call
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Error running {operation}: {source}")]
    External {
        operation: &'static str,
        #[source]
        source: GitError,
    },

    #[error("Internal error while running tool '{tool}'")]
    Internal { tool: String },
}

impl ToolError {
    /// Shorthand for an argument validation failure
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Result type alias for Git Status MCP operations
pub type Result<T> = std::result::Result<T, GitMcpError>;
