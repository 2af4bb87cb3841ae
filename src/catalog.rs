use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar argument value. Tools see arguments untyped until the
/// guardrail has validated them; the wire format must round-trip every
/// variant unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric view: a `Number`, or a `Text` that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One argument map per instruction; never shared across calls.
pub type ArgumentMap = BTreeMap<String, ArgValue>;

/// Declared parameter. Presence is the only contract enforced; shape
/// descriptors are intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
}

impl ToolParameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// Declared order drives deterministic validation messages.
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|param| param.name == name)
    }
}

pub const HELLO_TOOL: &str = "hello";
pub const CONVERT_CURRENCY_TOOL: &str = "convert-currency";

/// Static registry of tool definitions. Built once at startup, read-only
/// afterwards, safe for concurrent readers.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    pub fn builtin() -> Self {
        Self {
            tools: vec![
                ToolDefinition {
                    name: HELLO_TOOL.to_string(),
                    description: "Greets the given name quickly.".to_string(),
                    parameters: vec![ToolParameter::new("name")],
                },
                ToolDefinition {
                    name: CONVERT_CURRENCY_TOOL.to_string(),
                    description:
                        "Convert an amount between currencies using exchangerate.host/convert"
                            .to_string(),
                    parameters: vec![
                        ToolParameter::new("from"),
                        ToolParameter::new("to"),
                        ToolParameter::new("amount"),
                    ],
                },
            ],
        }
    }

    /// Stable declared order.
    pub fn all(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}
