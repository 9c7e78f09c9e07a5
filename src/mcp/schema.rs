//! Declared tool input schemas
//!
//! A schema is the single source for both the JSON Schema advertised in
//! `tools/list` and the normalization applied to incoming arguments.

use serde_json::{json, Map, Number, Value};

use crate::error::ToolError;

/// Field value types a tool can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

impl FieldKind {
    fn json_type(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
        }
    }
}

/// A single declared argument
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
    pub minimum: Option<i64>,
}

impl FieldSpec {
    /// An optional string field
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
            required: false,
            default: None,
            minimum: None,
        }
    }

    /// An optional integer field
    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            description,
            required: false,
            default: None,
            minimum: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.kind.json_type()));
        prop.insert("description".into(), json!(self.description));
        if let Some(default) = &self.default {
            prop.insert("default".into(), default.clone());
        }
        if let Some(min) = self.minimum {
            prop.insert("minimum".into(), json!(min));
        }
        Value::Object(prop)
    }

    fn coerce(&self, value: Value) -> Result<Value, ToolError> {
        let coerced = match self.kind {
            FieldKind::String => coerce_string(value),
            FieldKind::Integer => coerce_integer(value),
        }
        .ok_or_else(|| {
            ToolError::invalid_argument(self.name, format!("expected {}", self.kind.json_type()))
        })?;

        if let (Some(min), Some(n)) = (self.minimum, coerced.as_i64()) {
            if n < min {
                return Err(ToolError::invalid_argument(
                    self.name,
                    format!("must be at least {}", min),
                ));
            }
        }

        Ok(coerced)
    }
}

/// Structural description of a tool's accepted arguments
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Render as a JSON Schema object for discovery
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        schema
    }

    /// Apply defaults and coercions to raw call arguments.
    ///
    /// `null` counts as absent. Fields not declared here are dropped.
    pub fn normalize(&self, args: Value) -> Result<Map<String, Value>, ToolError> {
        let mut raw = match args {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::invalid_argument(
                    "arguments",
                    format!("expected an object, got {}", type_name(&other)),
                ))
            }
        };

        let mut normalized = Map::new();
        for field in &self.fields {
            match raw.remove(field.name) {
                Some(Value::Null) | None => {
                    if let Some(default) = &field.default {
                        normalized.insert(field.name.to_string(), default.clone());
                    } else if field.required {
                        return Err(ToolError::invalid_argument(field.name, "is required"));
                    }
                }
                Some(value) => {
                    normalized.insert(field.name.to_string(), field.coerce(value)?);
                }
            }
        }

        Ok(normalized)
    }
}

fn coerce_string(value: Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn coerce_integer(value: Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Value::Number(n)),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| Value::Number(Number::from(f as i64))),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| Value::Number(i.into())),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
