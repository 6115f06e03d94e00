use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::JiraConfig;
use crate::domain::ticket::{TicketRequest, TicketResult};
use crate::error::{AppError, AppResult, Service};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<SecretString>,
    issue_type: String,
    timeout: Duration,
}

impl JiraClient {
    pub fn new(config: &JiraConfig, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            email: config.email.clone(),
            token: config.token.clone(),
            issue_type: config.issue_type.clone(),
            timeout,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &SecretString)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Precondition("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Precondition("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| AppError::Precondition("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &SecretString) -> String {
        let credentials = format!("{email}:{}", token.expose_secret());
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str) -> String {
        format!("{}/rest/api/2/issue", base_url.trim_end_matches('/'))
    }

    async fn submit(
        &self,
        base_url: &str,
        auth: String,
        body: &JiraCreateIssueRequest,
    ) -> AppResult<TicketResult> {
        let response = self
            .http
            .post(Self::issue_endpoint(base_url))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                AppError::transport(Service::TicketTracker, format!("failed to call Jira: {err}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            AppError::transport(
                Service::TicketTracker,
                format!("failed to read Jira response: {err}"),
            )
        })?;

        if status != StatusCode::CREATED {
            return Err(AppError::UpstreamStatus {
                service: Service::TicketTracker,
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: JiraCreateIssueResponse = serde_json::from_str(&text).map_err(|err| {
            AppError::decode(
                Service::TicketTracker,
                format!("failed to parse Jira response: {err}"),
            )
        })?;
        if payload.key.trim().is_empty() {
            return Err(AppError::decode(
                Service::TicketTracker,
                "Jira response contained an empty issue key",
            ));
        }

        Ok(TicketResult {
            issue_key: payload.key,
        })
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_ticket(&self, request: TicketRequest) -> AppResult<TicketResult> {
        let (base_url, email, token) = self.api_details()?;

        let project_key = request.project_key.trim();
        if project_key.is_empty() {
            return Err(AppError::Precondition(
                "project key must not be empty".to_string(),
            ));
        }

        let request_body = JiraCreateIssueRequest::new(
            project_key,
            &self.issue_type,
            &request.title,
            &request.description,
        );
        let auth = Self::auth_header(email, token);

        let result = tokio::time::timeout(self.timeout, self.submit(base_url, auth, &request_body))
            .await
            .map_err(|_| AppError::timed_out(Service::TicketTracker, self.timeout))??;

        info!(issue_key = %result.issue_key, project = project_key, "Jira issue created");
        Ok(result)
    }
}

#[derive(Serialize)]
struct JiraCreateIssueRequest {
    fields: JiraCreateIssueFields,
}

impl JiraCreateIssueRequest {
    fn new(project_key: &str, issue_type: &str, summary: &str, description: &str) -> Self {
        Self {
            fields: JiraCreateIssueFields {
                project: JiraProject {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                description: description.to_string(),
                issuetype: JiraIssueType {
                    name: issue_type.to_string(),
                },
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCreateIssueFields {
    project: JiraProject,
    summary: String,
    description: String,
    issuetype: JiraIssueType,
}

#[derive(Serialize)]
struct JiraProject {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueType {
    name: String,
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
}
