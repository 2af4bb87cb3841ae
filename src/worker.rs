use crate::catalog::{ArgumentMap, CONVERT_CURRENCY_TOOL, HELLO_TOOL};
use serde::Deserialize;

/// Demo-grade fallback; real deployments set EXCHANGERATE_API_KEY.
const API_KEY_ENV: &str = "EXCHANGERATE_API_KEY";
const FALLBACK_ACCESS_KEY: &str = "demo";
const CONVERT_ENDPOINT: &str = "https://api.exchangerate.host/convert";

/// Everything a worker can fail with is reported the same way: a
/// diagnostic on stderr and a non-zero exit. Upstream HTTP trouble is a
/// handler failure, never a transport failure.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("unknown tool `{name}`")]
    UnknownTool { name: String },
    #[error("invalid tool arguments: {source}")]
    InvalidArguments {
        #[source]
        source: serde_json::Error,
    },
    #[error("missing argument `{parameter}`")]
    MissingArgument { parameter: String },
    #[error("conversion request failed: {0}")]
    UpstreamRequest(String),
    #[error("conversion failed: {0}")]
    UpstreamPayload(String),
}

/// Detects the `--tool <name> --args <json>` pair in the startup argv.
/// Its presence selects one-shot worker mode; absent `--args` means an
/// empty argument map.
pub fn tool_call_from_args(args: &[String]) -> Option<(String, String)> {
    let tool_index = args.iter().position(|arg| arg == "--tool")?;
    let name = args.get(tool_index + 1)?.clone();
    let payload = args
        .iter()
        .position(|arg| arg == "--args")
        .and_then(|index| args.get(index + 1))
        .cloned()
        .unwrap_or_else(|| "{}".to_string());
    Some((name, payload))
}

/// Worker-side dispatch: decode the argument map, look up the handler,
/// run it.
pub fn run_tool(name: &str, args_json: &str) -> Result<String, WorkerError> {
    let args: ArgumentMap = serde_json::from_str(args_json)
        .map_err(|source| WorkerError::InvalidArguments { source })?;
    match name {
        HELLO_TOOL => Ok(hello(&args)),
        CONVERT_CURRENCY_TOOL => convert_currency(&args),
        other => Err(WorkerError::UnknownTool {
            name: other.to_string(),
        }),
    }
}

/// One-shot mode for the binary: result on stdout and exit 0, or a
/// diagnostic on stderr and exit 1.
pub fn run_one_shot(name: &str, args_json: &str) -> i32 {
    match run_tool(name, args_json) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn hello(args: &ArgumentMap) -> String {
    let name = args
        .get("name")
        .map(|value| value.to_string())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "there".to_string());
    format!("Hello, {name}!")
}

#[derive(Debug, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub query: Option<ConvertQuery>,
    pub info: Option<ConvertInfo>,
    pub result: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConvertInfo {
    #[serde(default)]
    pub timestamp: i64,
    pub quote: f64,
}

fn convert_currency(args: &ArgumentMap) -> Result<String, WorkerError> {
    let from = required_text(args, "from")?;
    let to = required_text(args, "to")?;
    let amount = args
        .get("amount")
        .and_then(|value| value.as_number())
        .ok_or_else(|| WorkerError::MissingArgument {
            parameter: "amount".to_string(),
        })?;

    let access_key =
        std::env::var(API_KEY_ENV).unwrap_or_else(|_| FALLBACK_ACCESS_KEY.to_string());
    let url = format!(
        "{CONVERT_ENDPOINT}?access_key={}&from={}&to={}&amount={}",
        urlencoding::encode(&access_key),
        urlencoding::encode(&from),
        urlencoding::encode(&to),
        urlencoding::encode(&amount.to_string()),
    );

    let response = ureq::get(&url)
        .call()
        .map_err(|err| WorkerError::UpstreamRequest(err.to_string()))?;
    let payload = response
        .into_json::<ConvertResponse>()
        .map_err(|err| WorkerError::UpstreamRequest(err.to_string()))?;

    format_conversion(&payload)
}

/// Pure reconciliation of the upstream payload, split out so it is
/// testable without the network.
pub fn format_conversion(payload: &ConvertResponse) -> Result<String, WorkerError> {
    if !payload.success {
        return Err(WorkerError::UpstreamPayload(
            "rate service reported success=false".to_string(),
        ));
    }
    let query = payload
        .query
        .as_ref()
        .ok_or_else(|| WorkerError::UpstreamPayload("missing `query` field".to_string()))?;
    let info = payload
        .info
        .as_ref()
        .ok_or_else(|| WorkerError::UpstreamPayload("missing `info` field".to_string()))?;
    let converted = payload
        .result
        .ok_or_else(|| WorkerError::UpstreamPayload("missing `result` field".to_string()))?;

    let when = chrono::DateTime::from_timestamp(info.timestamp, 0)
        .filter(|_| info.timestamp > 0)
        .map(|ts| format!(" @ {}", ts.format("%Y-%m-%d %H:%M:%SZ")))
        .unwrap_or_default();

    Ok(format!(
        "{} {} = {:.4} {} (rate {:.6}{})",
        query.amount, query.from, converted, query.to, info.quote, when
    ))
}

fn required_text(args: &ArgumentMap, parameter: &str) -> Result<String, WorkerError> {
    args.get(parameter)
        .map(|value| value.to_string())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| WorkerError::MissingArgument {
            parameter: parameter.to_string(),
        })
}
