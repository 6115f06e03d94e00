use std::env;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{AppError, AppResult};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_ISSUE_TYPE: &str = "Task";
pub const DEFAULT_SERVER_ADDR: &str = "localhost:50051";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:50051";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraConfig,
    pub llm: LlmConfig,
    pub timeouts: TimeoutConfig,
    pub relay: RelayConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub token: Option<SecretString>,
    pub default_project: Option<String>,
    pub issue_type: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    pub classify: Duration,
    pub generate: Duration,
    pub submit: Duration,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub server_addr: String,
    pub listen_addr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AppError::Configuration(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            classify: Duration::from_secs(5),
            generate: Duration::from_secs(120),
            submit: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = TimeoutConfig::default();
        let timeouts = TimeoutConfig {
            classify: read_secs(&read, "TICKET_RELAY_CLASSIFY_TIMEOUT_SECS")?
                .unwrap_or(defaults.classify),
            generate: read_secs(&read, "TICKET_RELAY_GENERATE_TIMEOUT_SECS")?
                .unwrap_or(defaults.generate),
            submit: read_secs(&read, "TICKET_RELAY_SUBMIT_TIMEOUT_SECS")?
                .unwrap_or(defaults.submit),
        };

        let log_format = match read("TICKET_RELAY_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::Compact,
        };

        Ok(Self {
            jira: JiraConfig {
                base_url: read("JIRA_BASE_URL"),
                email: read("JIRA_EMAIL"),
                token: read("JIRA_API_TOKEN").map(SecretString::from),
                default_project: read("JIRA_PROJECT_KEY"),
                issue_type: read("JIRA_ISSUE_TYPE")
                    .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            },
            llm: LlmConfig {
                base_url: read("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: read("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            },
            timeouts,
            relay: RelayConfig {
                server_addr: read("MCP_SERVER_JIRA_ADDR")
                    .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
                listen_addr: read("TICKET_RELAY_LISTEN_ADDR")
                    .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            },
            log_format,
        })
    }

    /// Names of the Jira credentials that are not configured.
    pub fn missing_jira_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.jira.base_url.is_none() {
            missing.push("JIRA_BASE_URL");
        }
        if self.jira.email.is_none() {
            missing.push("JIRA_EMAIL");
        }
        if self.jira.token.is_none() {
            missing.push("JIRA_API_TOKEN");
        }
        missing
    }
}

fn read_secs<F>(read: &F, key: &str) -> AppResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = read(key) else {
        return Ok(None);
    };
    let secs = value.parse::<u64>().map_err(|err| {
        AppError::Configuration(format!("{key} must be a whole number of seconds: {err}"))
    })?;
    if secs == 0 {
        return Err(AppError::Configuration(format!("{key} must be greater than zero")));
    }
    Ok(Some(Duration::from_secs(secs)))
}
