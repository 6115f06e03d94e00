use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::jira::JiraClient;
use crate::infra::ollama::OllamaClient;
use crate::services::{IssueTrackerService, LanguageModelService};

/// Everything one request needs. Cloned per server handler; holds no mutable state.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            language_model,
        }
    }

    /// Wires the production Jira and Ollama clients from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let issue_tracker = Arc::new(JiraClient::new(&config.jira, config.timeouts.submit));
        let language_model = Arc::new(OllamaClient::new(
            config.llm.base_url.clone(),
            config.llm.model.clone(),
        ));
        Self::new(config, issue_tracker, language_model)
    }
}
