//! Request dispatcher
//!
//! Routes discovery and invocation requests to the tool registry and turns
//! every tool outcome into a [`CallToolResult`]. Only an unknown tool name
//! escapes as an error; the transport reports it at the protocol level.

use serde_json::Value;

use crate::error::{McpError, ToolError};
use crate::mcp::registry::ToolRegistry;
use crate::mcp::types::{CallToolResult, Tool};

const EXTERNAL_FAILURE_GUIDANCE: &str = "Please ensure:\n\
1. You are in a git repository\n\
2. Git is installed and available in PATH\n\
3. You have proper permissions to access the directory";

/// Dispatches MCP tool requests against a frozen registry
#[derive(Clone)]
pub struct Dispatcher {
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Discovery: every registered tool, in registration order
    pub fn handle_list_tools(&self) -> Vec<Tool> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|d| d.to_tool())
            .collect()
    }

    /// Invocation: run `name` with `arguments`
    pub async fn handle_call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        let handler = self.registry.resolve(name).ok_or_else(|| {
            tracing::warn!(tool = %name, "call for unknown tool");
            McpError::UnknownTool {
                name: name.to_string(),
            }
        })?;

        let args = match handler.descriptor().input_schema.normalize(arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::debug!(tool = %name, error = %e, "rejected tool arguments");
                return Ok(error_result(&e));
            }
        };

        tracing::debug!(tool = %name, "dispatching tool call");

        // A panicking handler must not take the server down with it.
        let task = tokio::spawn(async move { handler.call(args).await });
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "tool handler aborted");
                Err(ToolError::Internal {
                    tool: name.to_string(),
                })
            }
        };

        Ok(match outcome {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                error_result(&e)
            }
        })
    }
}

fn error_result(err: &ToolError) -> CallToolResult {
    match err {
        ToolError::External { .. } => {
            CallToolResult::error(format!("{}\n\n{}", err, EXTERNAL_FAILURE_GUIDANCE))
        }
        ToolError::InvalidArgument { .. } | ToolError::Internal { .. } => {
            CallToolResult::error(err.to_string())
        }
    }
}
