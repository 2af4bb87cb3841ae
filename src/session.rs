use crate::catalog::{ArgumentMap, ToolCatalog};
use crate::dispatch::{self, DispatchError, InvocationOutput, ToolCall, WorkerCommand};
use crate::guardrail::{self, GuardrailPolicy};
use crate::reasoner::{Reasoner, ToolChoice};
use crate::shared::ids::generate_call_id;
use crate::shared::logging::append_session_log_line;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Terminal state of one instruction. `Blocked`, `Invalid` and
/// `Cancelled` are reached without ever invoking the worker.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Blank input; not an end-of-session signal.
    Ignored,
    NoSuitableTool,
    Blocked { tool: String },
    Invalid { message: String },
    Cancelled { tool: String },
    Completed { tool: String, payload: String },
    Failed { tool: String, error: DispatchError },
}

impl TurnOutcome {
    /// One human-readable line per turn; `None` for ignored input.
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Ignored => None,
            Self::NoSuitableTool => Some("No suitable tool for that instruction.".to_string()),
            Self::Blocked { tool } => Some(format!("Blocked: {tool}")),
            Self::Invalid { message } => Some(format!("Validation failed: {message}")),
            Self::Cancelled { .. } => Some("Cancelled.".to_string()),
            Self::Completed { payload, .. } => Some(format!("→ {payload}")),
            Self::Failed { error, .. } => Some(format!("Execution failed: {error}")),
        }
    }
}

/// Per-turn pipeline: decide → allow-list → resolve → fill → validate →
/// confirm → dispatch. Generic over the dispatch and confirmation
/// effects so tests can instrument ordering and count invocations.
///
/// Transport failures are retried at most once, with whatever deadline
/// budget remains; worker-reported failures are final.
pub fn handle_instruction<D, C>(
    instruction: &str,
    reasoner: &dyn Reasoner,
    catalog: &ToolCatalog,
    policy: &GuardrailPolicy,
    timeout: Duration,
    mut dispatch: D,
    mut confirm: C,
) -> TurnOutcome
where
    D: FnMut(&ToolCall) -> Result<InvocationOutput, DispatchError>,
    C: FnMut(&str, &ArgumentMap) -> bool,
{
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return TurnOutcome::Ignored;
    }

    let deadline = Instant::now() + timeout;
    let tool_name = match reasoner.decide(instruction, catalog.all(), deadline) {
        ToolChoice::Tool(name) => name,
        ToolChoice::NoSuitableTool => return TurnOutcome::NoSuitableTool,
    };

    // Fail-closed gate, checked before anything else touches the call.
    if !policy.is_allowed(&tool_name) {
        return TurnOutcome::Blocked { tool: tool_name };
    }

    let tool = match catalog.find(&tool_name) {
        Some(tool) => tool,
        None => {
            // The reasoner promised a catalog name; surface the breach
            // instead of ignoring it.
            return TurnOutcome::Invalid {
                message: format!("tool `{tool_name}` is not in the catalog"),
            };
        }
    };

    let args = reasoner.fill(instruction, tool, deadline);
    if let Err(issue) = guardrail::validate(tool, &args) {
        return TurnOutcome::Invalid {
            message: issue.to_string(),
        };
    }

    if policy.needs_confirmation(tool, &args) && !confirm(&tool_name, &args) {
        return TurnOutcome::Cancelled { tool: tool_name };
    }

    let call = ToolCall {
        tool: tool_name.clone(),
        args,
        call_id: Some(generate_call_id()),
        timeout: deadline.saturating_duration_since(Instant::now()),
    };

    let result = match dispatch(&call) {
        Err(error) if error.is_transport() => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                Err(error)
            } else {
                let retry = ToolCall {
                    timeout: remaining,
                    ..call.clone()
                };
                dispatch(&retry)
            }
        }
        other => other,
    };

    match result {
        Ok(output) => TurnOutcome::Completed {
            tool: tool_name,
            payload: output.payload,
        },
        Err(error) => TurnOutcome::Failed {
            tool: tool_name,
            error,
        },
    }
}

pub struct SessionDeps<'a> {
    pub reasoner: &'a dyn Reasoner,
    pub catalog: &'a ToolCatalog,
    pub policy: &'a GuardrailPolicy,
    pub worker: WorkerCommand,
    pub timeout: Duration,
    pub session_log: Option<PathBuf>,
}

/// Interactive loop: one instruction per line until EOF. Every outcome
/// is reported as a single line and the loop always reads the next
/// instruction; no turn carries state into the next one.
pub fn run_loop(
    input: impl BufRead,
    mut output: impl Write,
    deps: &SessionDeps<'_>,
) -> std::io::Result<()> {
    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;

        let outcome = handle_instruction(
            &line,
            deps.reasoner,
            deps.catalog,
            deps.policy,
            deps.timeout,
            |call| {
                let spec = dispatch::build_command(&deps.worker, call)?;
                log_event(deps, &format!("dispatch {}", spec.command_form));
                dispatch::run_command(&spec, call.timeout)
            },
            |tool, args| {
                let rendered =
                    serde_json::to_string(args).unwrap_or_else(|_| "<unrenderable>".to_string());
                let asked = writeln!(
                    output,
                    "About to call '{tool}' with: {rendered}. Proceed? (y/N)"
                );
                if asked.is_err() {
                    return false;
                }
                matches!(lines.next(), Some(Ok(answer)) if answer.trim().eq_ignore_ascii_case("y"))
            },
        );

        if let Some(line) = outcome.describe() {
            writeln!(output, "{line}")?;
            log_event(deps, &line);
        }
    }
    Ok(())
}

fn log_event(deps: &SessionDeps<'_>, event: &str) {
    if let Some(path) = &deps.session_log {
        let stamped = format!("[{}] {event}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));
        let _ = append_session_log_line(path, &stamped);
    }
}
