use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Upstream party an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    CompletionService,
    TicketTracker,
    RelayServer,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::CompletionService => "completion service",
            Service::TicketTracker => "ticket tracker",
            Service::RelayServer => "relay server",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error("{service} transport error: {message}")]
    Transport { service: Service, message: String },
    #[error("{service} transport error: timed out after {}s", .after.as_secs_f32())]
    Timeout { service: Service, after: Duration },
    #[error("{service} responded with {status}: {body}")]
    UpstreamStatus {
        service: Service,
        status: u16,
        body: String,
    },
    #[error("{service} decode error: {message}")]
    Decode { service: Service, message: String },
    #[error("received nil response from {0}")]
    NilResponse(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn transport(service: Service, message: impl Into<String>) -> Self {
        AppError::Transport {
            service,
            message: message.into(),
        }
    }

    pub fn decode(service: Service, message: impl Into<String>) -> Self {
        AppError::Decode {
            service,
            message: message.into(),
        }
    }

    pub fn timed_out(service: Service, after: Duration) -> Self {
        AppError::Timeout { service, after }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
