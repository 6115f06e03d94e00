use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::idea::IssueIdea;
use crate::domain::ticket::{CreatedTicket, TicketRequest};
use crate::error::{AppError, AppResult};
use crate::workflow::prompts::issue_prompt;

pub const SYNCED: &str = "synced";

/// Picks the caller's project key, falling back to the configured default.
pub fn resolve_project(ctx: &AppContext, project_key: &str) -> AppResult<String> {
    let requested = project_key.trim();
    if !requested.is_empty() {
        return Ok(requested.to_string());
    }
    ctx.config
        .jira
        .default_project
        .clone()
        .ok_or_else(|| {
            AppError::Precondition(
                "no project key given and JIRA_PROJECT_KEY is not set".to_string(),
            )
        })
}

/// Generate, extract, sanitize, submit. Any failing stage aborts the whole call.
pub async fn create_from_prompt(
    ctx: &AppContext,
    project_key: &str,
    prompt: &str,
) -> AppResult<CreatedTicket> {
    let project = resolve_project(ctx, project_key)?;
    debug!(project = %project, prompt, "generating issue from prompt");

    let raw = ctx
        .language_model
        .generate(&issue_prompt(prompt), ctx.config.timeouts.generate)
        .await?;
    let idea = IssueIdea::extract(&raw).sanitized();
    debug!(title = %idea.title, "issue idea extracted");

    let result = ctx
        .issue_tracker
        .create_ticket(TicketRequest::from_idea(project.as_str(), &idea))
        .await?;

    info!(issue_key = %result.issue_key, project = %project, "ticket created from prompt");
    Ok(CreatedTicket { result, idea })
}

/// Acknowledges a sync request for a project. Nothing is fetched.
pub async fn sync_issues(ctx: &AppContext, project_key: &str) -> AppResult<&'static str> {
    let project = resolve_project(ctx, project_key)?;
    info!(project = %project, "syncing project");
    Ok(SYNCED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Service;
    use crate::test_support::{FakeLanguageModel, FakeTracker, context_with};

    #[tokio::test]
    async fn creates_sanitized_ticket_from_generated_text() {
        let long_title = "x".repeat(300);
        let model = FakeLanguageModel::generating(&format!(
            "Title: {long_title}\nDescription:\nUsers cannot log in"
        ));
        let tracker = FakeTracker::returning("PROJ-7");
        let ctx = context_with(model.clone(), tracker.clone(), Some("DEFAULT"));

        let created = create_from_prompt(&ctx, "PROJ", "login is broken")
            .await
            .expect("create");

        assert_eq!(created.issue_key(), "PROJ-7");
        assert_eq!(created.idea.title.len(), 255);
        assert_eq!(created.idea.description, "Users cannot log in");

        let submitted = tracker.requests();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].project_key, "PROJ");
        assert_eq!(submitted[0].title, created.idea.title);

        let prompts = model.generate_prompts();
        assert!(prompts[0].starts_with("login is broken"));
        assert!(prompts[0].contains("Title: <your title here>"));
    }

    #[tokio::test]
    async fn empty_project_falls_back_to_default() {
        let tracker = FakeTracker::returning("DEF-1");
        let ctx = context_with(
            FakeLanguageModel::generating("Title: A\nDescription:\nB"),
            tracker.clone(),
            Some("DEF"),
        );

        create_from_prompt(&ctx, "", "anything").await.expect("create");
        assert_eq!(tracker.requests()[0].project_key, "DEF");
    }

    #[tokio::test]
    async fn missing_project_fails_before_generation() {
        let model = FakeLanguageModel::generating("Title: A\nDescription:\nB");
        let tracker = FakeTracker::returning("X-1");
        let ctx = context_with(model.clone(), tracker.clone(), None);

        let err = create_from_prompt(&ctx, " ", "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert!(model.generate_prompts().is_empty());
        assert!(tracker.requests().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_creates_no_ticket() {
        let model = FakeLanguageModel::failing_generation(AppError::decode(
            Service::CompletionService,
            "failed to unmarshal chunk",
        ));
        let tracker = FakeTracker::returning("PROJ-1");
        let ctx = context_with(model, tracker.clone(), Some("PROJ"));

        let err = create_from_prompt(&ctx, "PROJ", "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
        assert!(tracker.requests().is_empty());
    }

    #[tokio::test]
    async fn unstructured_generation_uses_placeholders() {
        let tracker = FakeTracker::returning("PROJ-2");
        let ctx = context_with(
            FakeLanguageModel::generating("I could not decide."),
            tracker.clone(),
            Some("PROJ"),
        );

        let created = create_from_prompt(&ctx, "PROJ", "anything").await.expect("create");
        assert_eq!(created.idea.title, "Untitled");
        assert_eq!(created.idea.description, "No description provided");
    }

    #[tokio::test]
    async fn sync_acknowledges_project() {
        let ctx = context_with(
            FakeLanguageModel::generating(""),
            FakeTracker::returning("X-1"),
            None,
        );
        assert_eq!(sync_issues(&ctx, "PROJ").await.expect("sync"), "synced");
        assert!(matches!(
            sync_issues(&ctx, "").await.unwrap_err(),
            AppError::Precondition(_)
        ));
    }
}
