//! Git Status MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing git status and git log
//! as tools over stdio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use git_status_mcp_server::config::Config;
use git_status_mcp_server::exec::ProcessRunner;
use git_status_mcp_server::git::GitClient;
use git_status_mcp_server::mcp::dispatcher::Dispatcher;
use git_status_mcp_server::mcp::server::McpServer;
use git_status_mcp_server::mcp::tools::builtin_registry;

/// Git Status MCP Server
#[derive(Parser)]
#[command(name = "git-status-mcp-server")]
#[command(author, version, about = "Git Status MCP Server - A Model Context Protocol server for git")]
struct Cli {
    /// Git executable to run (overrides GIT_MCP_GIT_BIN)
    #[arg(long)]
    git_bin: Option<String>,

    /// Timeout for a single git command in milliseconds (overrides GIT_MCP_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Directory used when a tool call does not name one (overrides GIT_MCP_DEFAULT_DIR)
    #[arg(long)]
    directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging; stdout belongs to the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::new()
        .and_then(|c| c.with_overrides(cli.git_bin, cli.timeout_ms, cli.directory))
        .context("failed to load configuration")?;

    tracing::debug!(?config, "configuration loaded");

    // The registry is complete before the transport reads a single message.
    let runner = Arc::new(ProcessRunner::new(config.timeout));
    let git = Arc::new(GitClient::new(runner, &config));
    let registry = builtin_registry(git).context("failed to register tools")?;

    let server = McpServer::new(Dispatcher::new(registry));
    server.run_stdio().await.context("transport failure")?;

    Ok(())
}
