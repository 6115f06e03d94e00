use std::sync::Arc;

use clap::Args;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::rpc::client::RelayClient;
use crate::rpc::{JiraRelay, LocalRelay};

/// Where relay operations run.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Relay server address (host:port or URL). Defaults to MCP_SERVER_JIRA_ADDR.
    #[arg(long, conflicts_with = "local")]
    pub server: Option<String>,
    /// Run the pipeline in this process instead of calling a relay server.
    #[arg(long)]
    pub local: bool,
}

pub fn relay_for(config: AppConfig, target: &TargetArgs) -> Arc<dyn JiraRelay> {
    if target.local {
        warn_missing_credentials(&config);
        return Arc::new(LocalRelay::new(AppContext::from_config(config)));
    }
    let addr = target
        .server
        .clone()
        .unwrap_or_else(|| config.relay.server_addr.clone());
    Arc::new(RelayClient::new(&addr, config.jira.default_project.clone()))
}

pub fn warn_missing_credentials(config: &AppConfig) {
    for key in config.missing_jira_credentials() {
        eprintln!("Warning: {key} not configured; ticket creation will fail.");
    }
}

pub async fn sync(relay: &dyn JiraRelay, project: &str) -> AppResult<()> {
    let response = relay.sync(project).await?;
    println!("Project {project}: {}", response.status);
    Ok(())
}

pub async fn create_card(relay: &dyn JiraRelay, project: &str, prompt: &str) -> AppResult<()> {
    let response = relay.create_card(project, prompt).await?;
    println!("Ticket {} {}.", response.issue_key, response.status);
    Ok(())
}

pub async fn message(relay: &dyn JiraRelay, prompt: &str) -> AppResult<()> {
    let response = relay.message(prompt).await?;
    println!("{}", response.message);
    Ok(())
}
