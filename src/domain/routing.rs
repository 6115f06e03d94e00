#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Needs the ticket tracker.
    Remote,
    /// Answerable without side effects.
    Local,
}

impl RoutingDecision {
    /// Interprets raw classifier output. Anything that doesn't clearly ask for the
    /// ticket tracker routes locally, so an ambiguous answer never creates a ticket.
    pub fn from_classifier_output(raw: &str) -> Self {
        let answer = raw.trim().to_lowercase();
        if answer.contains("mcp") {
            RoutingDecision::Remote
        } else {
            RoutingDecision::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingDecision::Remote => "remote",
            RoutingDecision::Local => "local",
        }
    }
}

const TICKET_NOUNS: [&str; 4] = ["card", "issue", "ticket", "jira"];

/// True when the prompt explicitly asks to create a ticket.
pub fn requests_ticket_creation(prompt: &str) -> bool {
    let prompt = prompt.to_lowercase();
    prompt.contains("create") && TICKET_NOUNS.iter().any(|noun| prompt.contains(noun))
}
