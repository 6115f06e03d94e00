pub mod jira;
pub mod ollama;
pub mod stream;
