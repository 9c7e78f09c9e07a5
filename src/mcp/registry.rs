//! Tool registry
//!
//! Maps tool names to their descriptor and handler. Built once through
//! [`RegistryBuilder`]; the finished [`ToolRegistry`] has no mutating methods.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{RegistryError, ToolError};
use crate::mcp::schema::InputSchema;
use crate::mcp::types::Tool;

/// Discovery metadata for a tool
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    /// Wire representation used in `tools/list`
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            input_schema: self.input_schema.to_json_schema(),
        }
    }
}

/// Behaviour bound to a tool
///
/// Receives arguments already normalized against the tool's schema and
/// returns the text for a successful result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    async fn call(&self, args: Map<String, Value>) -> Result<String, ToolError>;
}

/// Collects handlers before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler; names must be unique
    pub fn register(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, RegistryError> {
        let name = handler.descriptor().name;
        if self.tools.iter().any(|t| t.descriptor().name == name) {
            return Err(RegistryError::DuplicateTool {
                name: name.to_string(),
            });
        }
        self.tools.push(handler);
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

/// Read-only, registration-ordered set of tools
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Descriptors in registration order
    pub fn list_tools(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools
            .iter()
            .find(|t| t.descriptor().name == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
