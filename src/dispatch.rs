use crate::catalog::ArgumentMap;
use std::io::{BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How to reach the worker executable. `args` is a fixed argv prefix;
/// the tool-call pair is appended per invocation.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// Default worker: this same binary re-invoked in one-shot mode.
    pub fn current_exe() -> std::io::Result<Self> {
        Ok(Self {
            program: std::env::current_exe()?.display().to_string(),
            args: Vec::new(),
        })
    }
}

/// One tool invocation. Transient; built fresh per instruction.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub tool: String,
    pub args: ArgumentMap,
    pub call_id: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct InvocationLog {
    pub tool: String,
    pub call_id: Option<String>,
    pub command_form: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct InvocationOutput {
    pub payload: String,
    pub log: InvocationLog,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("tool `{tool}` timed out after {timeout_ms}ms")]
    Timeout {
        tool: String,
        timeout_ms: u64,
        log: Box<InvocationLog>,
    },
    /// Worker ran and reported a business failure. Never retried: the
    /// arguments were already validated once and the failure is final.
    #[error("tool `{tool}` failed: {message}")]
    Worker {
        tool: String,
        message: String,
        log: Box<InvocationLog>,
    },
    /// Process failed to start or a stream broke. Callers may retry
    /// once with whatever deadline budget remains.
    #[error("transport failure for tool `{tool}`: {message}")]
    Transport { tool: String, message: String },
}

impl DispatchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub command_form: String,
    pub tool: String,
    pub call_id: Option<String>,
}

/// Serializes the argument map and builds the worker argv. The tool
/// name and the JSON payload are discrete argv units; nothing is ever
/// concatenated into a shell-interpreted string.
pub fn build_command(worker: &WorkerCommand, call: &ToolCall) -> Result<CommandSpec, DispatchError> {
    let payload = serde_json::to_string(&call.args).map_err(|err| DispatchError::Transport {
        tool: call.tool.clone(),
        message: format!("failed to encode arguments: {err}"),
    })?;

    let mut args = worker.args.clone();
    args.push("--tool".to_string());
    args.push(call.tool.clone());
    args.push("--args".to_string());
    args.push(payload);

    let command_form = format!("{} {}", worker.program, args.join(" "));
    Ok(CommandSpec {
        program: worker.program.clone(),
        args,
        command_form,
        tool: call.tool.clone(),
        call_id: call.call_id.clone(),
    })
}

/// Runs the worker to completion or the deadline, whichever is first.
/// On deadline the child is killed and reaped; no orphaned processes.
pub fn run_command(spec: &CommandSpec, timeout: Duration) -> Result<InvocationOutput, DispatchError> {
    let base_log = InvocationLog {
        tool: spec.tool.clone(),
        call_id: spec.call_id.clone(),
        command_form: spec.command_form.clone(),
        exit_code: None,
        timed_out: false,
    };

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|err| transport(&spec.tool, err))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| transport(&spec.tool, std::io::Error::other("missing stdout pipe")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| transport(&spec.tool, std::io::Error::other("missing stderr pipe")))?;

    let stdout_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut reader = BufReader::new(stdout);
        let _ = reader.read_to_string(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut reader = BufReader::new(stderr);
        let _ = reader.read_to_string(&mut buf);
        buf
    });

    let start = Instant::now();
    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let status = child.wait().map_err(|err| transport(&spec.tool, err))?;
                    let _stdout = stdout_reader.join().unwrap_or_default();
                    let _stderr = stderr_reader.join().unwrap_or_default();
                    let mut log = base_log.clone();
                    log.timed_out = true;
                    log.exit_code = status.code();
                    return Err(DispatchError::Timeout {
                        tool: spec.tool.clone(),
                        timeout_ms: timeout.as_millis() as u64,
                        log: Box::new(log),
                    });
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(err) => return Err(transport(&spec.tool, err)),
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    let mut log = base_log;
    log.exit_code = exit_status.code();

    if !exit_status.success() {
        let message = if stderr.trim().is_empty() {
            format!(
                "worker exited with status {}",
                exit_status.code().unwrap_or(-1)
            )
        } else {
            stderr.trim().to_string()
        };
        return Err(DispatchError::Worker {
            tool: spec.tool.clone(),
            message,
            log: Box::new(log),
        });
    }

    Ok(InvocationOutput {
        payload: stdout.trim().to_string(),
        log,
    })
}

/// Full dispatch path: serialize, spawn, collect, reconcile.
pub fn invoke(worker: &WorkerCommand, call: &ToolCall) -> Result<InvocationOutput, DispatchError> {
    let spec = build_command(worker, call)?;
    run_command(&spec, call.timeout)
}

fn transport(tool: &str, err: std::io::Error) -> DispatchError {
    DispatchError::Transport {
        tool: tool.to_string(),
        message: err.to_string(),
    }
}
