use async_trait::async_trait;

use crate::domain::ticket::{TicketRequest, TicketResult};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_ticket(&self, request: TicketRequest) -> AppResult<TicketResult>;
}
