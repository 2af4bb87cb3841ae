use crate::dispatch::WorkerCommand;
use crate::guardrail::GuardrailPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "AGENTLOOP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "agentloop.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in settings {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Worker executable; defaults to the current binary re-invoked in
    /// one-shot mode.
    pub program: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub worker: WorkerSettings,
    #[serde(default = "default_invoke_timeout_secs")]
    pub invoke_timeout_secs: u64,
    #[serde(default)]
    pub session_log: Option<PathBuf>,
    #[serde(default)]
    pub guardrail: GuardrailPolicy,
}

fn default_invoke_timeout_secs() -> u64 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worker: WorkerSettings::default(),
            invoke_timeout_secs: default_invoke_timeout_secs(),
            session_log: None,
            guardrail: GuardrailPolicy::default(),
        }
    }
}

impl Settings {
    /// Missing file means defaults; a present but unreadable or
    /// malformed file is an error.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }

    pub fn worker_command(&self) -> std::io::Result<WorkerCommand> {
        match &self.worker.program {
            Some(program) => Ok(WorkerCommand {
                program: program.display().to_string(),
                args: self.worker.args.clone(),
            }),
            None => {
                let mut command = WorkerCommand::current_exe()?;
                command.args = self.worker.args.clone();
                Ok(command)
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
