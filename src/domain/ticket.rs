use crate::domain::idea::IssueIdea;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequest {
    pub project_key: String,
    pub title: String,
    pub description: String,
}

impl TicketRequest {
    pub fn from_idea(project_key: impl Into<String>, idea: &IssueIdea) -> Self {
        Self {
            project_key: project_key.into(),
            title: idea.title.clone(),
            description: idea.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketResult {
    pub issue_key: String,
}

/// A submitted ticket together with the content it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTicket {
    pub result: TicketResult,
    pub idea: IssueIdea,
}

impl CreatedTicket {
    pub fn issue_key(&self) -> &str {
        &self.result.issue_key
    }
}
