use clap::{Args, Subcommand};
use secrecy::{ExposeSecret, SecretString};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the resolved configuration (secrets masked).
    Show,
}

pub fn run(config: &AppConfig, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            for (label, value) in describe(config) {
                println!("{label}: {value}");
            }
            Ok(())
        }
    }
}

fn describe(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Jira base URL", display_value(&config.jira.base_url)),
        ("Jira email", display_value(&config.jira.email)),
        ("Jira API token", mask_secret(&config.jira.token)),
        ("Default project", display_value(&config.jira.default_project)),
        ("Issue type", config.jira.issue_type.clone()),
        ("Completion service URL", config.llm.base_url.clone()),
        ("Completion model", config.llm.model.clone()),
        (
            "Classify timeout",
            format!("{}s", config.timeouts.classify.as_secs()),
        ),
        (
            "Generate timeout",
            format!("{}s", config.timeouts.generate.as_secs()),
        ),
        (
            "Submit timeout",
            format!("{}s", config.timeouts.submit.as_secs()),
        ),
        ("Relay server", config.relay.server_addr.clone()),
        ("Listen address", config.relay.listen_addr.clone()),
    ]
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<SecretString>) -> String {
    let Some(secret) = value else {
        return "<not set>".to_string();
    };
    let token = secret.expose_secret();
    let chars: Vec<char> = token.chars().collect();
    match chars.len() {
        0 => "<not set>".to_string(),
        len if len > 6 => {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[len - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        _ => "***".to_string(),
    }
}
