use crate::domain::idea::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};

/// Wraps a user prompt with the layout the issue extractor understands.
pub fn issue_prompt(prompt: &str) -> String {
    format!(
        "{prompt}\n\nJIRA requirements:\n\
         1. Title must be less than {MAX_TITLE_LEN} characters.\n\
         2. Description must be less than {MAX_DESCRIPTION_LEN} characters.\n\
         3. Summary must be less than {MAX_TITLE_LEN} characters.\n\n\
         Please respond in this format:\nTitle: <your title here>\nDescription:\n<your description here>"
    )
}

/// Asks the model to label a prompt `mcp` (ticket work) or `local` (conversation).
pub fn routing_prompt(prompt: &str) -> String {
    format!(
        "You are a request router for a Jira assistant.\n\
         Decide whether the user's message must be handled by the Jira MCP server or can be \
         answered locally.\n\n\
         Answer \"mcp\" when the message asks to create, update, assign, search, sync or \
         otherwise manage Jira tickets, issues, cards or projects.\n\
         Answer \"local\" for greetings, general questions and casual conversation.\n\n\
         Reply with exactly one word: mcp or local.\n\n\
         User message: {prompt}"
    )
}
