//! Git Status MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing read-only git tools.
//! Tool calls shell out to the git executable and return its output as text.

pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod mcp;

pub use config::Config;
pub use error::{GitMcpError, Result};
