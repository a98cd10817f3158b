//! Draft use-cases: regenerate into a new version, and status changes.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::client::{generate_content, GenerationRequest, GenerationTask, Generator};
use crate::generation::prompt_builder::build_content_prompt;
use crate::models::draft::{ContentDraft, NewDraft};
use crate::models::idea::ContentIdea;
use crate::models::ContentType;
use crate::pipeline::context::GenerationContext;
use crate::pipeline::ideas::{brief_of, completion_text, idea_ref};
use crate::status::{validate_transition, BatchOutcome, DraftStatus, SkippedItem};
use crate::store::{ContentStore, DraftStore, IdeaStore};

#[derive(Debug, Clone, Deserialize)]
pub struct RegenerateRequest {
    pub instructions: Option<String>,
}

/// Appends regeneration instructions to the idea's notes for one prompt. The
/// stored idea is not modified.
fn fold_instructions(mut idea: ContentIdea, instructions: Option<&str>) -> ContentIdea {
    let Some(instructions) = instructions.map(str::trim).filter(|i| !i.is_empty()) else {
        return idea;
    };
    let folded = match idea.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => format!("{notes}\n\nRegeneration instructions: {instructions}"),
        None => format!("Regeneration instructions: {instructions}"),
    };
    idea.notes = Some(folded);
    idea
}

/// Writes `content` as the next version of the (idea, content type) lineage.
/// Existing versions are never overwritten.
pub async fn create_new_version(
    store: &dyn ContentStore,
    idea: &ContentIdea,
    content_type: ContentType,
    content: String,
) -> Result<ContentDraft, AppError> {
    let version = store
        .latest_draft_version(idea.id, content_type)
        .await?
        .map_or(1, |v| v + 1);

    store
        .create_draft(NewDraft {
            idea_id: idea.id,
            content_type,
            content_goal: idea.content_goal,
            version,
            content,
            feedback: None,
            status: DraftStatus::Draft,
        })
        .await
}

/// Rebuilds the prompt for the draft's idea with `instructions` folded into its
/// notes, generates, and stores the result as a new version.
pub async fn regenerate(
    store: &dyn ContentStore,
    generator: &dyn Generator,
    draft_id: Uuid,
    instructions: Option<&str>,
) -> Result<ContentDraft, AppError> {
    let draft = store
        .get_draft(draft_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content draft", draft_id))?;
    let idea = store
        .get_idea(draft.idea_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content idea", draft.idea_id))?;

    let ctx =
        GenerationContext::load(store, idea.user_id, &idea.pillar_ids, &idea.audience_ids).await?;
    let prompt_idea = fold_instructions(idea.clone(), instructions);
    let request = GenerationRequest {
        prompt: build_content_prompt(&ctx.prompt_input(brief_of(&prompt_idea), draft.content_type)),
        content_type: draft.content_type,
        idea: Some(idea_ref(&idea)),
        task: GenerationTask::GenerateContent,
        user_id: idea.user_id,
        tenant_id: ctx.tenant_id(),
    };

    let content = completion_text(generate_content(generator, request, false).await?)?;
    let created = create_new_version(store, &idea, draft.content_type, content).await?;

    info!(
        idea_id = %idea.id,
        previous_draft_id = %draft.id,
        draft_id = %created.id,
        version = created.version,
        "Regenerated draft"
    );
    Ok(created)
}

pub async fn update_draft_status(
    store: &dyn ContentStore,
    draft_id: Uuid,
    next: DraftStatus,
) -> Result<ContentDraft, AppError> {
    let draft = store
        .get_draft(draft_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content draft", draft_id))?;

    if let Err(e) = validate_transition(draft.status, next) {
        warn!(%draft_id, "Rejected draft status change: {e}");
        return Err(e.into());
    }

    let updated = store.set_draft_status(draft_id, next).await?;
    info!(%draft_id, status = ?next, "Updated draft status");
    Ok(updated)
}

pub async fn batch_update_draft_status(
    store: &dyn ContentStore,
    ids: &[Uuid],
    next: DraftStatus,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        requested: ids.len(),
        ..BatchOutcome::default()
    };

    for &id in ids {
        match update_draft_status(store, id, next).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => outcome.skipped.push(SkippedItem {
                id,
                reason: e.to_string(),
            }),
        }
    }

    info!(
        requested = outcome.requested,
        succeeded = outcome.succeeded,
        status = ?next,
        "Batch draft status update finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::testing::ScriptedGenerator;
    use crate::models::idea::{IdeaSource, NewIdea};
    use crate::status::IdeaStatus;
    use crate::store::memory::MemoryStore;

    async fn idea_with_draft(store: &MemoryStore, status: DraftStatus) -> (ContentIdea, ContentDraft) {
        let idea = store
            .create_idea(NewIdea {
                user_id: Uuid::new_v4(),
                tenant_id: None,
                title: "Onboarding in a week".to_string(),
                description: None,
                notes: Some("Mention the checklist".to_string()),
                content_goal: None,
                call_to_action: None,
                source: IdeaSource::Manual,
                source_url: None,
                source_excerpt: None,
                document_id: None,
                status: IdeaStatus::Drafted,
                content_type: Some(ContentType::Newsletter),
                pillar_ids: Vec::new(),
                audience_ids: Vec::new(),
            })
            .await
            .unwrap();
        let draft = create_new_version(store, &idea, ContentType::Newsletter, "v1".to_string())
            .await
            .unwrap();
        let draft = store.set_draft_status(draft.id, status).await.unwrap();
        (idea, draft)
    }

    #[tokio::test]
    async fn test_regenerate_creates_new_version_and_keeps_old() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::ok("v2 body");
        let (idea, first) = idea_with_draft(&store, DraftStatus::Draft).await;

        let second = regenerate(&store, &generator, first.id, Some("Make it punchier"))
            .await
            .unwrap();

        assert_eq!(second.version, 2);
        assert_eq!(second.content, "v2 body");
        assert_ne!(second.id, first.id);

        let old = store.get_draft(first.id).await.unwrap().unwrap();
        assert_eq!(old.content, "v1");

        let sent = generator.requests.lock().unwrap();
        assert!(sent[0].prompt.contains("Mention the checklist"));
        assert!(sent[0]
            .prompt
            .contains("Regeneration instructions: Make it punchier"));

        // Instructions shape the prompt only.
        let stored = store.get_idea(idea.id).await.unwrap().unwrap();
        assert_eq!(stored.notes.as_deref(), Some("Mention the checklist"));
    }

    #[tokio::test]
    async fn test_regenerate_failure_creates_no_version() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::failing("content filter triggered");
        let (_, first) = idea_with_draft(&store, DraftStatus::Draft).await;

        let err = regenerate(&store, &generator, first.id, None).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
        assert_eq!(store.draft_count(), 1);
    }

    #[tokio::test]
    async fn test_draft_cannot_skip_ready() {
        let store = MemoryStore::new();
        let (_, draft) = idea_with_draft(&store, DraftStatus::Draft).await;
        let writes_before = store.draft_status_writes();

        let err = update_draft_status(&store, draft.id, DraftStatus::Published)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StatusTransition(_)));
        assert_eq!(store.draft_status_writes(), writes_before);
    }

    #[tokio::test]
    async fn test_concurrent_transitions_from_same_state_last_write_wins() {
        let store = MemoryStore::new();
        let (_, draft) = idea_with_draft(&store, DraftStatus::Draft).await;
        let writes_before = store.draft_status_writes();

        let (ready, archived) = tokio::join!(
            update_draft_status(&store, draft.id, DraftStatus::Ready),
            update_draft_status(&store, draft.id, DraftStatus::Archived),
        );

        assert!(ready.is_ok());
        assert!(archived.is_ok());
        assert_eq!(store.draft_status_writes() - writes_before, 2);

        let stored = store.get_draft(draft.id).await.unwrap().unwrap();
        assert!(matches!(
            stored.status,
            DraftStatus::Ready | DraftStatus::Archived
        ));
    }

    #[tokio::test]
    async fn test_batch_publish_skips_drafts_not_ready() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for _ in 0..2 {
            ids.push(idea_with_draft(&store, DraftStatus::Ready).await.1.id);
        }
        ids.push(idea_with_draft(&store, DraftStatus::Draft).await.1.id);
        ids.push(idea_with_draft(&store, DraftStatus::Archived).await.1.id);

        let outcome = batch_update_draft_status(&store, &ids, DraftStatus::Published).await;
        assert_eq!(outcome.requested, 4);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[test]
    fn test_fold_instructions_without_existing_notes() {
        let idea = ContentIdea {
            notes: None,
            ..sample_idea()
        };
        let folded = fold_instructions(idea, Some("  shorter  "));
        assert_eq!(
            folded.notes.as_deref(),
            Some("Regeneration instructions: shorter")
        );
    }

    #[test]
    fn test_blank_instructions_leave_notes_alone() {
        let folded = fold_instructions(sample_idea(), Some("   "));
        assert_eq!(folded.notes.as_deref(), Some("keep"));
    }

    fn sample_idea() -> ContentIdea {
        ContentIdea {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tenant_id: None,
            title: "t".to_string(),
            description: None,
            notes: Some("keep".to_string()),
            content_goal: None,
            call_to_action: None,
            source: IdeaSource::Manual,
            source_url: None,
            source_excerpt: None,
            document_id: None,
            status: IdeaStatus::Approved,
            content_type: None,
            has_been_used: false,
            pillar_ids: Vec::new(),
            audience_ids: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }
}
