//! MCP Server implementation
//!
//! Newline-delimited JSON-RPC over stdio. Each complete line is one message;
//! requests are handled one at a time, in arrival order.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{McpError, Result};
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::types::*;

/// MCP Server info
pub const SERVER_NAME: &str = "git-status-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Readiness line written to stderr once the transport is live
pub const READY_MESSAGE: &str = "Git Status MCP Server started and listening on stdio";

/// MCP Server for git tools
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run the server on stdio until stdin closes
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        eprintln!("{}", READY_MESSAGE);
        self.serve(stdin, stdout).await
    }

    /// Serve messages from `reader`, writing responses to `writer`.
    ///
    /// Returns `Ok` on end of input. Any read or write failure is a
    /// transport error and ends the session.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    return Err(McpError::Transport {
                        message: format!("failed to read from input: {}", e),
                    }
                    .into())
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                let written = async {
                    writer.write_all(&payload).await?;
                    writer.flush().await
                };
                written.await.map_err(|e| McpError::Transport {
                    message: format!("failed to write response: {}", e),
                })?;
            }
        }

        tracing::info!("input closed, shutting down");
        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    ///
    /// A message without an `id` member is a notification. An explicit
    /// `"id": null` is still a request and gets a response.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(message) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let has_id = raw.get("id").is_some();
        let raw_id: Option<RequestId> = raw
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value(id).ok());

        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "malformed request");
                return Some(JsonRpcResponse::error(
                    raw_id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        tracing::debug!(method = %request.method, id = ?request.id, "received message");

        if !has_id {
            self.handle_notification(&request);
            return None;
        }

        let id = request.id.clone();
        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(&request),
            methods::PING => Ok(serde_json::json!({})),
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => self.handle_call_tool(&request).await,
            _ => Err(JsonRpcError::method_not_found(&request.method)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => tracing::info!("client initialized"),
            other => tracing::debug!(method = %other, "ignoring notification"),
        }
    }

    /// Handle initialize request
    fn handle_initialize(
        &self,
        request: &JsonRpcRequest,
    ) -> std::result::Result<Value, JsonRpcError> {
        let params: InitializeParams = request
            .params
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                version = %client.version,
                protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
                "initialize"
            );
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        to_result(&result)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = ListToolsResult {
            tools: self.dispatcher.handle_list_tools(),
        };

        to_result(&result)
    }

    /// Handle call tool request
    async fn handle_call_tool(
        &self,
        request: &JsonRpcRequest,
    ) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = match request.params.clone() {
            Some(p) => serde_json::from_value(p).map_err(|e| {
                JsonRpcError::invalid_params(format!("Invalid tool parameters: {}", e))
            })?,
            None => return Err(JsonRpcError::invalid_params("Missing tool parameters")),
        };

        match self
            .dispatcher
            .handle_call_tool(&params.name, params.arguments)
            .await
        {
            Ok(result) => to_result(&result),
            Err(e @ McpError::UnknownTool { .. }) => Err(JsonRpcError::invalid_params(e.to_string())),
            Err(e) => Err(JsonRpcError::internal_error(e.to_string())),
        }
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
