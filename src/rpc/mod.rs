//! Caller-facing surface: the three relay operations, served over HTTP/JSON and
//! callable either remotely or in-process.

pub mod client;
pub mod server;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::{issue, message};

pub const CREATED: &str = "created";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub project_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[serde(default)]
    pub project_key: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardResponse {
    pub issue_key: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The relay operations as seen by a caller.
#[async_trait]
pub trait JiraRelay: Send + Sync {
    async fn sync(&self, project_key: &str) -> AppResult<SyncResponse>;
    async fn create_card(&self, project_key: &str, prompt: &str) -> AppResult<CreateCardResponse>;
    async fn message(&self, prompt: &str) -> AppResult<MessageResponse>;
}

/// Runs the pipeline in this process.
pub struct LocalRelay {
    ctx: AppContext,
}

impl LocalRelay {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl JiraRelay for LocalRelay {
    async fn sync(&self, project_key: &str) -> AppResult<SyncResponse> {
        let status = issue::sync_issues(&self.ctx, project_key).await?;
        Ok(SyncResponse {
            status: status.to_string(),
        })
    }

    async fn create_card(&self, project_key: &str, prompt: &str) -> AppResult<CreateCardResponse> {
        let created = issue::create_from_prompt(&self.ctx, project_key, prompt).await?;
        Ok(CreateCardResponse {
            issue_key: created.result.issue_key,
            status: CREATED.to_string(),
        })
    }

    async fn message(&self, prompt: &str) -> AppResult<MessageResponse> {
        let outcome = message::handle_message(&self.ctx, prompt).await?;
        Ok(MessageResponse {
            message: outcome.render(),
        })
    }
}
