//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol for tool invocation.

pub mod dispatcher;
pub mod registry;
pub mod schema;
pub mod server;
pub mod tools;
pub mod types;
