use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Single-shot completion, returned whole.
    async fn complete(&self, prompt: &str, deadline: Duration) -> AppResult<String>;

    /// Streamed completion, reassembled into the final text.
    async fn generate(&self, prompt: &str, deadline: Duration) -> AppResult<String>;
}
