use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AppError, AppResult, Service};
use crate::rpc::server::{CARDS_PATH, MESSAGES_PATH, SYNC_PATH};
use crate::rpc::{
    CreateCardRequest, CreateCardResponse, ErrorResponse, JiraRelay, MessageRequest,
    MessageResponse, SyncRequest, SyncResponse,
};

const SYNC_DEADLINE: Duration = Duration::from_secs(5);
const CREATE_CARD_DEADLINE: Duration = Duration::from_secs(120);
const MESSAGE_DEADLINE: Duration = Duration::from_secs(120);

/// Calls a relay server over HTTP.
pub struct RelayClient {
    http: Client,
    base_url: String,
    default_project: Option<String>,
}

impl RelayClient {
    /// `addr` may be `host:port` or a full URL.
    pub fn new(addr: &str, default_project: Option<String>) -> Self {
        let addr = addr.trim().trim_end_matches('/');
        let base_url = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        Self {
            http: Client::new(),
            base_url,
            default_project,
        }
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req, deadline: Duration) -> AppResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "calling relay server");
        tokio::time::timeout(deadline, self.exchange(&url, request))
            .await
            .map_err(|_| AppError::timed_out(Service::RelayServer, deadline))?
    }

    async fn exchange<Req, Resp>(&self, url: &str, request: &Req) -> AppResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                AppError::transport(Service::RelayServer, format!("request failed: {err}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AppError::transport(Service::RelayServer, format!("failed to read response: {err}"))
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|envelope| envelope.error)
                .unwrap_or(body);
            return Err(AppError::UpstreamStatus {
                service: Service::RelayServer,
                status: status.as_u16(),
                body: detail,
            });
        }

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(AppError::NilResponse(Service::RelayServer.to_string()));
        }

        serde_json::from_str(trimmed).map_err(|err| {
            AppError::decode(Service::RelayServer, format!("failed to parse response: {err}"))
        })
    }
}

#[async_trait]
impl JiraRelay for RelayClient {
    async fn sync(&self, project_key: &str) -> AppResult<SyncResponse> {
        let request = SyncRequest {
            project_key: project_key.to_string(),
        };
        self.call(SYNC_PATH, &request, SYNC_DEADLINE).await
    }

    async fn create_card(&self, project_key: &str, prompt: &str) -> AppResult<CreateCardResponse> {
        let project_key = match project_key.trim() {
            "" => self.default_project.clone().unwrap_or_default(),
            key => key.to_string(),
        };
        let request = CreateCardRequest {
            project_key,
            prompt: prompt.to_string(),
        };
        self.call(CARDS_PATH, &request, CREATE_CARD_DEADLINE).await
    }

    async fn message(&self, prompt: &str) -> AppResult<MessageResponse> {
        let request = MessageRequest {
            prompt: prompt.to_string(),
        };
        self.call(MESSAGES_PATH, &request, MESSAGE_DEADLINE).await
    }
}
