pub mod issue;
pub mod message;
pub mod prompts;
