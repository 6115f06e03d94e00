use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::rpc::{
    CreateCardRequest, CreateCardResponse, ErrorResponse, JiraRelay, LocalRelay, MessageRequest,
    MessageResponse, SyncRequest, SyncResponse,
};

pub const SYNC_PATH: &str = "/v1/sync";
pub const CARDS_PATH: &str = "/v1/cards";
pub const MESSAGES_PATH: &str = "/v1/messages";

type SharedRelay = Arc<dyn JiraRelay>;

pub fn router(relay: SharedRelay) -> Router {
    Router::new()
        .route(SYNC_PATH, post(sync_issues))
        .route(CARDS_PATH, post(create_card))
        .route(MESSAGES_PATH, post(message))
        .with_state(relay)
}

pub async fn serve(ctx: AppContext) -> AppResult<()> {
    let listen_addr = ctx.config.relay.listen_addr.clone();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!(address = %listen_addr, "relay server listening");

    let relay: SharedRelay = Arc::new(LocalRelay::new(ctx));
    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("relay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn sync_issues(
    State(relay): State<SharedRelay>,
    ApiJson(request): ApiJson<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    info!(project = %request.project_key, "SyncIssues called");
    Ok(Json(relay.sync(&request.project_key).await?))
}

async fn create_card(
    State(relay): State<SharedRelay>,
    ApiJson(request): ApiJson<CreateCardRequest>,
) -> Result<Json<CreateCardResponse>, ApiError> {
    info!(project = %request.project_key, "CreateCard called");
    Ok(Json(
        relay
            .create_card(&request.project_key, &request.prompt)
            .await?,
    ))
}

async fn message(
    State(relay): State<SharedRelay>,
    ApiJson(request): ApiJson<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Message called");
    Ok(Json(relay.message(&request.prompt).await?))
}

/// `Json` extractor whose rejections answer with the same `{error}` body as
/// every other failure.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

pub struct ApiError(AppError);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Precondition(format!(
            "invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Precondition(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Transport { .. }
            | AppError::UpstreamStatus { .. }
            | AppError::Decode { .. }
            | AppError::NilResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = %self.0, "request failed");
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
