use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::routing::{RoutingDecision, requests_ticket_creation};
use crate::domain::ticket::CreatedTicket;
use crate::error::AppResult;
use crate::workflow::issue::create_from_prompt;
use crate::workflow::prompts::routing_prompt;

pub const FORWARDED: &str = "Your request was forwarded to the Jira MCP server.";

/// Terminal state of one message exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    TicketCreated(CreatedTicket),
    Forwarded,
    Answered(String),
}

impl MessageOutcome {
    pub fn render(&self) -> String {
        match self {
            MessageOutcome::TicketCreated(ticket) => format!(
                "Created Jira issue {}\nTitle: {}\nDescription: {}",
                ticket.issue_key(),
                ticket.idea.title,
                ticket.idea.description
            ),
            MessageOutcome::Forwarded => FORWARDED.to_string(),
            MessageOutcome::Answered(reply) => reply.clone(),
        }
    }
}

/// Asks the completion service whether the prompt needs the ticket tracker.
pub async fn classify(ctx: &AppContext, prompt: &str) -> AppResult<RoutingDecision> {
    let raw = ctx
        .language_model
        .complete(&routing_prompt(prompt), ctx.config.timeouts.classify)
        .await?;
    let decision = RoutingDecision::from_classifier_output(&raw);
    debug!(raw = raw.trim(), decision = decision.as_str(), "prompt classified");
    Ok(decision)
}

pub async fn handle_message(ctx: &AppContext, prompt: &str) -> AppResult<MessageOutcome> {
    let decision = classify(ctx, prompt).await?;
    info!(decision = decision.as_str(), "routing message");

    let outcome = match decision {
        RoutingDecision::Remote if requests_ticket_creation(prompt) => {
            let project = ctx.config.jira.default_project.as_deref().unwrap_or_default();
            MessageOutcome::TicketCreated(create_from_prompt(ctx, project, prompt).await?)
        }
        RoutingDecision::Remote => MessageOutcome::Forwarded,
        RoutingDecision::Local => MessageOutcome::Answered(local_reply(prompt)),
    };
    Ok(outcome)
}

fn local_reply(prompt: &str) -> String {
    format!("Local response: {prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Service};
    use crate::test_support::{FakeLanguageModel, FakeTracker, context_with};

    #[tokio::test]
    async fn remote_ticket_request_creates_ticket_and_confirms() {
        let model = FakeLanguageModel::new(
            "mcp",
            "Title: Fix login bug\nDescription:\nUsers cannot log in",
        );
        let tracker = FakeTracker::returning("PROJ-42");
        let ctx = context_with(model.clone(), tracker.clone(), Some("PROJ"));

        let outcome = handle_message(&ctx, "create a ticket for the login bug")
            .await
            .expect("handle");
        let reply = outcome.render();

        assert!(matches!(outcome, MessageOutcome::TicketCreated(_)));
        assert!(reply.contains("PROJ-42"));
        assert!(reply.contains("Fix login bug"));
        assert!(reply.contains("Users cannot log in"));
        assert_eq!(tracker.requests()[0].project_key, "PROJ");
        assert!(model.complete_prompts()[0].contains("create a ticket for the login bug"));
    }

    #[tokio::test]
    async fn remote_without_ticket_keywords_is_forwarded() {
        let model = FakeLanguageModel::new("MCP", "unused");
        let tracker = FakeTracker::returning("PROJ-1");
        let ctx = context_with(model.clone(), tracker.clone(), Some("PROJ"));

        let outcome = handle_message(&ctx, "assign PROJ-3 to me").await.expect("handle");
        assert_eq!(outcome, MessageOutcome::Forwarded);
        assert_eq!(outcome.render(), FORWARDED);
        assert!(model.generate_prompts().is_empty());
        assert!(tracker.requests().is_empty());
    }

    #[tokio::test]
    async fn local_messages_are_echoed_without_side_effects() {
        let model = FakeLanguageModel::new("local", "unused");
        let tracker = FakeTracker::returning("PROJ-1");
        let ctx = context_with(model.clone(), tracker.clone(), Some("PROJ"));

        let outcome = handle_message(&ctx, "hello there").await.expect("handle");
        assert_eq!(outcome.render(), "Local response: hello there");
        assert!(model.generate_prompts().is_empty());
        assert!(tracker.requests().is_empty());
    }

    #[tokio::test]
    async fn ambiguous_classification_never_creates_a_ticket() {
        let model = FakeLanguageModel::new("unsure", "Title: A\nDescription:\nB");
        let tracker = FakeTracker::returning("PROJ-1");
        let ctx = context_with(model, tracker.clone(), Some("PROJ"));

        let outcome = handle_message(&ctx, "create a ticket for the login bug")
            .await
            .expect("handle");
        assert!(matches!(outcome, MessageOutcome::Answered(_)));
        assert!(tracker.requests().is_empty());
    }

    #[tokio::test]
    async fn classification_failure_is_propagated() {
        let model = FakeLanguageModel::failing_completion(AppError::timed_out(
            Service::CompletionService,
            std::time::Duration::from_secs(5),
        ));
        let ctx = context_with(model, FakeTracker::returning("PROJ-1"), Some("PROJ"));

        let err = handle_message(&ctx, "hello").await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn classification_uses_short_deadline() {
        let model = FakeLanguageModel::new("local", "unused");
        let ctx = context_with(model.clone(), FakeTracker::returning("PROJ-1"), None);

        classify(&ctx, "hi").await.expect("classify");
        assert_eq!(model.deadlines(), vec![ctx.config.timeouts.classify]);
    }
}
