use crate::catalog::{ArgumentMap, ToolDefinition, CONVERT_CURRENCY_TOOL, HELLO_TOOL};
use serde::{Deserialize, Serialize};

/// Validation failures are terminal for the turn; the dispatcher is
/// never reached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("tool `{tool}` is missing required argument `{parameter}`")]
    MissingArgument { tool: String, parameter: String },
    #[error("tool `{tool}` argument `{parameter}` must not be blank")]
    BlankArgument { tool: String, parameter: String },
}

/// Allow-list and confirmation policy. Configuration, not literals; the
/// defaults reproduce the shipped demo behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailPolicy {
    #[serde(default = "default_allowed_tools")]
    pub allowed_tools: Vec<String>,
    #[serde(default = "default_monetary_tools")]
    pub monetary_tools: Vec<String>,
    #[serde(default = "default_confirm_amount_over")]
    pub confirm_amount_over: f64,
}

fn default_allowed_tools() -> Vec<String> {
    vec![HELLO_TOOL.to_string(), CONVERT_CURRENCY_TOOL.to_string()]
}

fn default_monetary_tools() -> Vec<String> {
    vec![CONVERT_CURRENCY_TOOL.to_string()]
}

fn default_confirm_amount_over() -> f64 {
    10_000.0
}

impl Default for GuardrailPolicy {
    fn default() -> Self {
        Self {
            allowed_tools: default_allowed_tools(),
            monetary_tools: default_monetary_tools(),
            confirm_amount_over: default_confirm_amount_over(),
        }
    }
}

impl GuardrailPolicy {
    /// Fail-closed membership test: anything not listed never reaches
    /// the dispatcher, whatever the reasoner returned.
    pub fn is_allowed(&self, tool_name: &str) -> bool {
        self.allowed_tools.iter().any(|name| name == tool_name)
    }

    /// Confirmation gate for monetary tools. Callers must only invoke
    /// this after `validate` succeeded.
    pub fn needs_confirmation(&self, tool: &ToolDefinition, args: &ArgumentMap) -> bool {
        if !self.monetary_tools.iter().any(|name| *name == tool.name) {
            return false;
        }
        args.get("amount")
            .and_then(|value| value.as_number())
            .map(|amount| amount > self.confirm_amount_over)
            .unwrap_or(false)
    }
}

/// Checks every declared parameter in declared order, so the first
/// violation reported is deterministic for a given (tool, args) pair.
pub fn validate(tool: &ToolDefinition, args: &ArgumentMap) -> Result<(), ValidationIssue> {
    for parameter in &tool.parameters {
        match args.get(&parameter.name) {
            None => {
                return Err(ValidationIssue::MissingArgument {
                    tool: tool.name.clone(),
                    parameter: parameter.name.clone(),
                })
            }
            Some(value) => {
                if value.as_text().is_some_and(|text| text.trim().is_empty()) {
                    return Err(ValidationIssue::BlankArgument {
                        tool: tool.name.clone(),
                        parameter: parameter.name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
