use crate::catalog::{
    ArgValue, ArgumentMap, ToolDefinition, CONVERT_CURRENCY_TOOL, HELLO_TOOL,
};
use std::time::Instant;

/// Outcome of tool selection. `Tool` always names an entry from the
/// supplied tool list; anything the reasoner cannot place maps to
/// `NoSuitableTool` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    Tool(String),
    NoSuitableTool,
}

/// Decision component contract. Implementations may block (a model
/// backend is a network call) and must give up by `deadline`; the
/// orchestration loop treats a late answer like `NoSuitableTool`.
pub trait Reasoner {
    fn decide(&self, instruction: &str, tools: &[ToolDefinition], deadline: Instant) -> ToolChoice;

    /// Best-effort argument synthesis. Omitting required parameters is
    /// allowed; validation happens in the guardrail, not here.
    fn fill(&self, instruction: &str, tool: &ToolDefinition, deadline: Instant) -> ArgumentMap;
}

/// Lexical baseline reasoner. Low precision by design; the trait exists
/// so a model-backed implementation can replace it without touching the
/// loop.
#[derive(Debug, Clone, Default)]
pub struct HeuristicReasoner;

impl Reasoner for HeuristicReasoner {
    fn decide(
        &self,
        instruction: &str,
        tools: &[ToolDefinition],
        _deadline: Instant,
    ) -> ToolChoice {
        let lowered = instruction.to_lowercase();
        let wants_currency = lowered.contains("convert")
            || (has_number_token(instruction) && has_currency_code_token(instruction));
        let candidate = if wants_currency {
            CONVERT_CURRENCY_TOOL
        } else {
            HELLO_TOOL
        };
        if tools.iter().any(|tool| tool.name == candidate) {
            ToolChoice::Tool(candidate.to_string())
        } else {
            ToolChoice::NoSuitableTool
        }
    }

    fn fill(&self, instruction: &str, tool: &ToolDefinition, _deadline: Instant) -> ArgumentMap {
        let mut args = ArgumentMap::new();
        match tool.name.as_str() {
            HELLO_TOOL => {
                let name = instruction
                    .split_whitespace()
                    .last()
                    .map(|token| token.trim_end_matches(['!', '.', ',', '?']))
                    .filter(|token| !token.is_empty())
                    .unwrap_or("there");
                args.insert("name".to_string(), ArgValue::from(name));
            }
            CONVERT_CURRENCY_TOOL => {
                let tokens: Vec<&str> = instruction.split_whitespace().collect();
                if let Some(amount) = tokens
                    .iter()
                    .find_map(|token| token.parse::<f64>().ok())
                {
                    args.insert("amount".to_string(), ArgValue::Number(amount));
                }
                let codes: Vec<String> = tokens
                    .iter()
                    .filter(|token| is_currency_code_shaped(token))
                    .map(|token| token.to_uppercase())
                    .collect();
                let from = codes.first().cloned().unwrap_or_else(|| "USD".to_string());
                let to = codes.last().cloned().unwrap_or_else(|| "EUR".to_string());
                args.insert("from".to_string(), ArgValue::Text(from));
                args.insert("to".to_string(), ArgValue::Text(to));
            }
            _ => {}
        }
        args
    }
}

fn is_currency_code_shaped(token: &str) -> bool {
    token.len() == 3 && token.chars().all(|ch| ch.is_ascii_alphabetic())
}

fn has_currency_code_token(instruction: &str) -> bool {
    instruction
        .split_whitespace()
        .any(is_currency_code_shaped)
}

fn has_number_token(instruction: &str) -> bool {
    instruction
        .split_whitespace()
        .any(|token| token.parse::<f64>().is_ok())
}
