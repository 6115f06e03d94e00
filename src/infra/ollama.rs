use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult, Service};
use crate::infra::stream::ChunkStream;
use crate::services::LanguageModelService;

/// Client for an Ollama-style `/api/generate` completion endpoint.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            model,
        }
    }

    fn generate_endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    async fn send(&self, prompt: &str, stream: bool) -> AppResult<Response> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream,
        };

        let response = self
            .http
            .post(self.generate_endpoint())
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                AppError::transport(
                    Service::CompletionService,
                    format!("request to completion service failed: {err}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::UpstreamStatus {
                service: Service::CompletionService,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn complete_inner(&self, prompt: &str) -> AppResult<String> {
        let response = self.send(prompt, false).await?;
        let payload: GenerateResponse = response.json().await.map_err(|err| {
            AppError::decode(
                Service::CompletionService,
                format!("failed to parse completion response: {err}"),
            )
        })?;
        Ok(payload.response)
    }

    async fn generate_inner(&self, prompt: &str) -> AppResult<String> {
        let response = self.send(prompt, true).await?;
        let chunks = ChunkStream::new(Box::pin(response.bytes_stream()));
        let (text, count) = chunks.collect_text().await?;
        debug!(chunks = count, bytes = text.len(), "completion stream reassembled");
        Ok(text)
    }
}

#[async_trait]
impl LanguageModelService for OllamaClient {
    async fn complete(&self, prompt: &str, deadline: Duration) -> AppResult<String> {
        tokio::time::timeout(deadline, self.complete_inner(prompt))
            .await
            .map_err(|_| AppError::timed_out(Service::CompletionService, deadline))?
    }

    async fn generate(&self, prompt: &str, deadline: Duration) -> AppResult<String> {
        tokio::time::timeout(deadline, self.generate_inner(prompt))
            .await
            .map_err(|_| AppError::timed_out(Service::CompletionService, deadline))?
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
