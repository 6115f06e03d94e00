//! Mock HTTP server and in-memory service fakes shared by tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::{TicketRequest, TicketResult};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, LanguageModelService};

pub struct MockServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub async fn spawn(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server listener");
        let address: SocketAddr = listener.local_addr().expect("mock listener local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("run mock server");
        });
        Self {
            base_url: format!("http://{address}"),
            shutdown: Some(shutdown_tx),
        }
    }

    /// `host:port` without the scheme.
    pub fn authority(&self) -> &str {
        self.base_url.trim_start_matches("http://")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Scripted completion service that records what it was asked.
#[derive(Clone, Default)]
pub struct FakeLanguageModel {
    inner: Arc<FakeModelState>,
}

#[derive(Default)]
struct FakeModelState {
    complete_reply: String,
    generate_reply: String,
    complete_error: Mutex<Option<AppError>>,
    generate_error: Mutex<Option<AppError>>,
    complete_prompts: Mutex<Vec<String>>,
    generate_prompts: Mutex<Vec<String>>,
    deadlines: Mutex<Vec<Duration>>,
}

impl FakeLanguageModel {
    pub fn new(complete_reply: &str, generate_reply: &str) -> Self {
        Self {
            inner: Arc::new(FakeModelState {
                complete_reply: complete_reply.to_string(),
                generate_reply: generate_reply.to_string(),
                ..FakeModelState::default()
            }),
        }
    }

    pub fn generating(text: &str) -> Self {
        Self::new("local", text)
    }

    pub fn failing_generation(error: AppError) -> Self {
        let model = Self::new("mcp", "");
        *model.inner.generate_error.lock().expect("lock") = Some(error);
        model
    }

    pub fn failing_completion(error: AppError) -> Self {
        let model = Self::new("", "");
        *model.inner.complete_error.lock().expect("lock") = Some(error);
        model
    }

    pub fn complete_prompts(&self) -> Vec<String> {
        self.inner.complete_prompts.lock().expect("lock").clone()
    }

    pub fn generate_prompts(&self) -> Vec<String> {
        self.inner.generate_prompts.lock().expect("lock").clone()
    }

    pub fn deadlines(&self) -> Vec<Duration> {
        self.inner.deadlines.lock().expect("lock").clone()
    }
}

#[async_trait]
impl LanguageModelService for FakeLanguageModel {
    async fn complete(&self, prompt: &str, deadline: Duration) -> AppResult<String> {
        self.inner.complete_prompts.lock().expect("lock").push(prompt.to_string());
        self.inner.deadlines.lock().expect("lock").push(deadline);
        match self.inner.complete_error.lock().expect("lock").take() {
            Some(error) => Err(error),
            None => Ok(self.inner.complete_reply.clone()),
        }
    }

    async fn generate(&self, prompt: &str, deadline: Duration) -> AppResult<String> {
        self.inner.generate_prompts.lock().expect("lock").push(prompt.to_string());
        self.inner.deadlines.lock().expect("lock").push(deadline);
        match self.inner.generate_error.lock().expect("lock").take() {
            Some(error) => Err(error),
            None => Ok(self.inner.generate_reply.clone()),
        }
    }
}

/// Ticket tracker that hands out a fixed key and records submissions.
#[derive(Clone)]
pub struct FakeTracker {
    issue_key: String,
    requests: Arc<Mutex<Vec<TicketRequest>>>,
}

impl FakeTracker {
    pub fn returning(issue_key: &str) -> Self {
        Self {
            issue_key: issue_key.to_string(),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<TicketRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn create_ticket(&self, request: TicketRequest) -> AppResult<TicketResult> {
        self.requests.lock().expect("lock").push(request);
        Ok(TicketResult {
            issue_key: self.issue_key.clone(),
        })
    }
}

pub fn test_config(default_project: Option<&str>) -> AppConfig {
    let project = default_project.map(str::to_string);
    AppConfig::from_lookup(|key| match key {
        "JIRA_PROJECT_KEY" => project.clone(),
        _ => None,
    })
    .expect("test config")
}

pub fn context_with(
    model: FakeLanguageModel,
    tracker: FakeTracker,
    default_project: Option<&str>,
) -> AppContext {
    AppContext::new(test_config(default_project), Arc::new(tracker), Arc::new(model))
}
