//! Idea use-cases: create, save-and-generate, generate a draft for a saved idea,
//! and status changes (single and batch).
//!
//! The store offers no multi-row transactions, so each use-case commits its
//! steps in order and a failure leaves everything before it in place.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, PipelineStep};
use crate::generation::client::{
    generate_content, GenerationOutcome, GenerationRequest, GenerationTask, Generator, IdeaRef,
};
use crate::generation::prompt_builder::{build_content_prompt, IdeaBrief};
use crate::models::draft::{ContentDraft, NewDraft};
use crate::models::idea::{ContentGoal, ContentIdea, IdeaSource, NewIdea};
use crate::models::ContentType;
use crate::pipeline::context::GenerationContext;
use crate::status::{
    is_valid_transition, validate_transition, BatchOutcome, DraftStatus, IdeaStatus, Lifecycle,
    SkippedItem,
};
use crate::store::{ContentStore, DraftStore, IdeaStore, ProfileStore};

const MAX_TITLE_CHARS: usize = 200;

/// The idea editor form, as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeaForm {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub content_goal: Option<ContentGoal>,
    pub call_to_action: Option<String>,
    pub source_url: Option<String>,
    pub content_type: ContentType,
    #[serde(default)]
    pub pillar_ids: Vec<Uuid>,
    #[serde(default)]
    pub audience_ids: Vec<Uuid>,
}

impl IdeaForm {
    pub fn validate(&self) -> Result<(), AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Idea title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "Idea title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        Ok(())
    }

    fn brief(&self) -> IdeaBrief<'_> {
        IdeaBrief {
            title: self.title.trim(),
            description: self.description.as_deref(),
            notes: self.notes.as_deref(),
            content_goal: self.content_goal,
            call_to_action: self.call_to_action.as_deref(),
            source_excerpt: None,
        }
    }

    fn into_new_idea(self, tenant_id: Option<Uuid>, status: IdeaStatus) -> NewIdea {
        NewIdea {
            user_id: self.user_id,
            tenant_id,
            title: self.title.trim().to_string(),
            description: self.description,
            notes: self.notes,
            content_goal: self.content_goal,
            call_to_action: self.call_to_action,
            source: IdeaSource::Manual,
            source_url: self.source_url,
            source_excerpt: None,
            document_id: None,
            status,
            content_type: Some(self.content_type),
            pillar_ids: self.pillar_ids,
            audience_ids: self.audience_ids,
        }
    }
}

/// Result of save-and-generate when every step committed.
#[derive(Debug, Clone, Serialize)]
pub struct SavedWithDraft {
    pub idea: ContentIdea,
    pub draft: ContentDraft,
}

/// Result of generating for a saved idea. Debug mode returns the prompt and
/// writes nothing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftGeneration {
    Draft {
        idea: ContentIdea,
        draft: ContentDraft,
    },
    DebugPrompt {
        prompt: String,
    },
}

pub(crate) fn brief_of(idea: &ContentIdea) -> IdeaBrief<'_> {
    IdeaBrief {
        title: &idea.title,
        description: idea.description.as_deref(),
        notes: idea.notes.as_deref(),
        content_goal: idea.content_goal,
        call_to_action: idea.call_to_action.as_deref(),
        source_excerpt: idea.source_excerpt.as_deref(),
    }
}

pub(crate) fn idea_ref(idea: &ContentIdea) -> IdeaRef {
    IdeaRef {
        id: Some(idea.id),
        title: idea.title.clone(),
        description: idea.description.clone(),
    }
}

/// Text of a non-debug generation.
pub(crate) fn completion_text(outcome: GenerationOutcome) -> Result<String, AppError> {
    match outcome {
        GenerationOutcome::Content(text) => Ok(text),
        GenerationOutcome::DebugPrompt(_) => Err(AppError::Internal(anyhow!(
            "Generation returned a debug prompt outside debug mode"
        ))),
    }
}

/// Persists a new idea. Only `unreviewed` and `approved` are valid starting states.
pub async fn create_idea(
    store: &dyn ContentStore,
    form: IdeaForm,
    initial_status: IdeaStatus,
) -> Result<ContentIdea, AppError> {
    if !matches!(initial_status, IdeaStatus::Unreviewed | IdeaStatus::Approved) {
        return Err(AppError::Validation(format!(
            "New ideas start as 'unreviewed' or 'approved', not '{}'",
            initial_status.as_str()
        )));
    }
    form.validate()?;

    let tenant_id = store
        .get_user(form.user_id)
        .await?
        .and_then(|user| user.tenant_id);
    let idea = store
        .create_idea(form.into_new_idea(tenant_id, initial_status))
        .await?;

    info!(idea_id = %idea.id, user_id = %idea.user_id, "Created content idea");
    Ok(idea)
}

/// Returns exactly the prompt save-and-generate would send for `form`. Writes nothing.
pub async fn debug_prompt_for_form(
    store: &dyn ContentStore,
    form: &IdeaForm,
) -> Result<String, AppError> {
    form.validate()?;
    let ctx = GenerationContext::load(store, form.user_id, &form.pillar_ids, &form.audience_ids)
        .await?;
    Ok(build_content_prompt(
        &ctx.prompt_input(form.brief(), form.content_type),
    ))
}

/// Validate → persist idea → generate → persist draft v1 → advance idea to `drafted`.
///
/// Any step that fails after the idea is persisted is reported as
/// `PartialPipelineFailure` naming that step. Nothing is rolled back: the idea
/// keeps whatever status it had reached.
pub async fn save_and_generate(
    store: &dyn ContentStore,
    generator: &dyn Generator,
    form: IdeaForm,
) -> Result<SavedWithDraft, AppError> {
    form.validate()?;
    let ctx = GenerationContext::load(store, form.user_id, &form.pillar_ids, &form.audience_ids)
        .await?;
    let content_type = form.content_type;
    let prompt = build_content_prompt(&ctx.prompt_input(form.brief(), content_type));

    let idea = store
        .create_idea(form.into_new_idea(ctx.tenant_id(), IdeaStatus::Approved))
        .await?;
    info!(idea_id = %idea.id, user_id = %idea.user_id, "Saved idea, generating first draft");

    let idea_id = idea.id;
    let partial = |step: PipelineStep| {
        move |e: AppError| {
            warn!(%idea_id, %step, "Idea saved but save-and-generate failed: {e}");
            e.after_idea_saved(idea_id, step)
        }
    };

    let request = GenerationRequest {
        prompt,
        content_type,
        idea: Some(idea_ref(&idea)),
        task: GenerationTask::GenerateContent,
        user_id: idea.user_id,
        tenant_id: ctx.tenant_id(),
    };
    let content = generate_content(generator, request, false)
        .await
        .map_err(AppError::from)
        .and_then(completion_text)
        .map_err(partial(PipelineStep::Generate))?;

    let draft = store
        .create_draft(NewDraft {
            idea_id,
            content_type,
            content_goal: idea.content_goal,
            version: 1,
            content,
            feedback: None,
            status: DraftStatus::Draft,
        })
        .await
        .map_err(partial(PipelineStep::SaveDraft))?;

    let idea = match validate_transition(idea.status, IdeaStatus::Drafted) {
        Ok(()) => store.set_idea_status(idea_id, IdeaStatus::Drafted).await,
        Err(e) => Err(e.into()),
    }
    .map_err(partial(PipelineStep::AdvanceStatus))?;

    info!(idea_id = %idea.id, draft_id = %draft.id, "Save-and-generate completed");
    Ok(SavedWithDraft { idea, draft })
}

/// Generates the next draft version for a persisted idea.
///
/// `content_type` falls back to the idea's own. The idea advances to `drafted`
/// only when that edge is legal from its current status.
pub async fn generate_draft_for_idea(
    store: &dyn ContentStore,
    generator: &dyn Generator,
    idea_id: Uuid,
    content_type: Option<ContentType>,
    debug: bool,
) -> Result<DraftGeneration, AppError> {
    let idea = store
        .get_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content idea", idea_id))?;
    let content_type = content_type.or(idea.content_type).ok_or_else(|| {
        AppError::Validation("A content type is required to generate a draft".to_string())
    })?;

    let ctx =
        GenerationContext::load(store, idea.user_id, &idea.pillar_ids, &idea.audience_ids).await?;
    let request = GenerationRequest {
        prompt: build_content_prompt(&ctx.prompt_input(brief_of(&idea), content_type)),
        content_type,
        idea: Some(idea_ref(&idea)),
        task: GenerationTask::GenerateContent,
        user_id: idea.user_id,
        tenant_id: ctx.tenant_id(),
    };

    let content = match generate_content(generator, request, debug).await? {
        GenerationOutcome::DebugPrompt(prompt) => return Ok(DraftGeneration::DebugPrompt { prompt }),
        GenerationOutcome::Content(text) => text,
    };

    let version = store
        .latest_draft_version(idea.id, content_type)
        .await?
        .map_or(1, |v| v + 1);
    let draft = store
        .create_draft(NewDraft {
            idea_id: idea.id,
            content_type,
            content_goal: idea.content_goal,
            version,
            content,
            feedback: None,
            status: DraftStatus::Draft,
        })
        .await?;

    let idea = if is_valid_transition(idea.status, IdeaStatus::Drafted) {
        store.set_idea_status(idea.id, IdeaStatus::Drafted).await?
    } else {
        idea
    };

    info!(idea_id = %idea.id, draft_id = %draft.id, version, "Generated draft for idea");
    Ok(DraftGeneration::Draft { idea, draft })
}

/// Validates `current → next` before touching the store. An illegal edge never
/// reaches persistence.
pub async fn update_idea_status(
    store: &dyn ContentStore,
    idea_id: Uuid,
    next: IdeaStatus,
) -> Result<ContentIdea, AppError> {
    let idea = store
        .get_idea(idea_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content idea", idea_id))?;

    if let Err(e) = validate_transition(idea.status, next) {
        warn!(%idea_id, "Rejected idea status change: {e}");
        return Err(e.into());
    }

    let updated = store.set_idea_status(idea_id, next).await?;
    info!(%idea_id, status = ?next, "Updated idea status");
    Ok(updated)
}

/// Applies one transition to each id independently. Members that fail are
/// skipped and reported; the rest still commit.
pub async fn batch_update_idea_status(
    store: &dyn ContentStore,
    ids: &[Uuid],
    next: IdeaStatus,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        requested: ids.len(),
        ..BatchOutcome::default()
    };

    for &id in ids {
        match update_idea_status(store, id, next).await {
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
        "Batch idea status update finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::classify::GenerationErrorKind;
    use crate::generation::client::testing::ScriptedGenerator;
    use crate::models::user::UserProfileInput;
    use crate::store::memory::MemoryStore;

    fn form(user_id: Uuid) -> IdeaForm {
        IdeaForm {
            user_id,
            title: "Why we stopped discounting".to_string(),
            description: Some("Pricing story".to_string()),
            notes: None,
            content_goal: Some(ContentGoal::ThoughtLeadership),
            call_to_action: Some("Book a call".to_string()),
            source_url: None,
            content_type: ContentType::Linkedin,
            pillar_ids: Vec::new(),
            audience_ids: Vec::new(),
        }
    }

    async fn seeded_idea(store: &MemoryStore, status: IdeaStatus) -> ContentIdea {
        let idea = create_idea(store, form(Uuid::new_v4()), IdeaStatus::Unreviewed)
            .await
            .unwrap();
        store.set_idea_status(idea.id, status).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_generate_creates_v1_draft_and_advances_idea() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::ok("Discounts trained our buyers to wait. #pricing");

        let saved = save_and_generate(&store, &generator, form(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(saved.draft.version, 1);
        assert_eq!(saved.draft.status, DraftStatus::Draft);
        assert_eq!(saved.draft.content_goal, Some(ContentGoal::ThoughtLeadership));
        assert_eq!(saved.idea.status, IdeaStatus::Drafted);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_idea_and_reports_partial_failure() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::failing("upstream returned 503");

        let err = save_and_generate(&store, &generator, form(Uuid::new_v4()))
            .await
            .unwrap_err();

        let AppError::PartialPipelineFailure {
            idea_id,
            step,
            source,
        } = err
        else {
            panic!("expected a partial pipeline failure");
        };
        assert_eq!(step, PipelineStep::Generate);
        let AppError::Generation(cause) = *source else {
            panic!("expected a generation cause");
        };
        assert_eq!(cause.kind(), GenerationErrorKind::ServerError);

        let idea = store.get_idea(idea_id).await.unwrap().unwrap();
        assert_eq!(idea.status, IdeaStatus::Approved);
        assert_eq!(store.draft_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_insert_failure_reports_partial_failure() {
        let store = MemoryStore::new();
        store.fail_draft_inserts();
        let generator = ScriptedGenerator::ok("Discounts trained our buyers to wait.");

        let err = save_and_generate(&store, &generator, form(Uuid::new_v4()))
            .await
            .unwrap_err();

        let AppError::PartialPipelineFailure {
            idea_id,
            step,
            source,
        } = err
        else {
            panic!("expected a partial pipeline failure");
        };
        assert_eq!(step, PipelineStep::SaveDraft);
        assert!(matches!(*source, AppError::Database(_)));

        let idea = store.get_idea(idea_id).await.unwrap().unwrap();
        assert_eq!(idea.status, IdeaStatus::Approved);
        assert_eq!(store.draft_count(), 0);
    }

    #[tokio::test]
    async fn test_status_advance_failure_reports_partial_failure() {
        let store = MemoryStore::new();
        store.fail_idea_status_writes();
        let generator = ScriptedGenerator::ok("Discounts trained our buyers to wait.");

        let err = save_and_generate(&store, &generator, form(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::PartialPipelineFailure {
                step: PipelineStep::AdvanceStatus,
                ..
            }
        ));
        assert_eq!(store.idea_count(), 1);
        assert_eq!(store.draft_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_persists_nothing() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::ok("unused");
        let mut bad = form(Uuid::new_v4());
        bad.title = "   ".to_string();

        let err = save_and_generate(&store, &generator, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.idea_count(), 0);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_debug_prompt_matches_what_generation_sends() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::ok("Post");
        let user_id = Uuid::new_v4();

        let debug = debug_prompt_for_form(&store, &form(user_id)).await.unwrap();
        assert_eq!(store.idea_count(), 0);

        save_and_generate(&store, &generator, form(user_id))
            .await
            .unwrap();
        let sent = generator.requests.lock().unwrap();
        assert_eq!(sent[0].prompt, debug);
    }

    #[tokio::test]
    async fn test_created_idea_inherits_user_tenant() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let tenant = store.create_tenant("acme.io", "acme.io").await.unwrap();
        store
            .upsert_user(
                user_id,
                UserProfileInput {
                    email: "sam@acme.io".to_string(),
                    full_name: None,
                    business_name: None,
                    business_description: None,
                },
                Some(tenant.id),
            )
            .await
            .unwrap();

        let idea = create_idea(&store, form(user_id), IdeaStatus::Approved)
            .await
            .unwrap();
        assert_eq!(idea.tenant_id, Some(tenant.id));
        assert_eq!(idea.status, IdeaStatus::Approved);
    }

    #[tokio::test]
    async fn test_create_rejects_non_initial_status() {
        let store = MemoryStore::new();
        let err = create_idea(&store, form(Uuid::new_v4()), IdeaStatus::Drafted)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.idea_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_transition_never_reaches_store() {
        let store = MemoryStore::new();
        let idea = create_idea(&store, form(Uuid::new_v4()), IdeaStatus::Unreviewed)
            .await
            .unwrap();

        let err = update_idea_status(&store, idea.id, IdeaStatus::Drafted)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StatusTransition(_)));
        assert_eq!(store.idea_status_writes(), 0);

        update_idea_status(&store, idea.id, IdeaStatus::Approved)
            .await
            .unwrap();
        assert_eq!(store.idea_status_writes(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_transitions_from_same_state_last_write_wins() {
        let store = MemoryStore::new();
        let idea = seeded_idea(&store, IdeaStatus::Unreviewed).await;
        let writes_before = store.idea_status_writes();

        let (approved, archived) = tokio::join!(
            update_idea_status(&store, idea.id, IdeaStatus::Approved),
            update_idea_status(&store, idea.id, IdeaStatus::Archived),
        );

        // Both validated against `unreviewed`, so both commit.
        assert_eq!(approved.unwrap().status, IdeaStatus::Approved);
        assert_eq!(archived.unwrap().status, IdeaStatus::Archived);
        assert_eq!(store.idea_status_writes() - writes_before, 2);

        let stored = store.get_idea(idea.id).await.unwrap().unwrap();
        assert!(matches!(
            stored.status,
            IdeaStatus::Approved | IdeaStatus::Archived
        ));
    }

    #[tokio::test]
    async fn test_batch_reports_only_legal_members_as_succeeded() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(seeded_idea(&store, IdeaStatus::Unreviewed).await.id);
        }
        // drafted → approved is not an edge
        for _ in 0..2 {
            ids.push(seeded_idea(&store, IdeaStatus::Drafted).await.id);
        }
        let writes_before = store.idea_status_writes();

        let outcome = batch_update_idea_status(&store, &ids, IdeaStatus::Approved).await;

        assert_eq!(outcome.requested, 5);
        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(store.idea_status_writes() - writes_before, 3);
    }

    #[tokio::test]
    async fn test_batch_skips_missing_ids() {
        let store = MemoryStore::new();
        let known = seeded_idea(&store, IdeaStatus::Approved).await.id;
        let missing = Uuid::new_v4();

        let outcome =
            batch_update_idea_status(&store, &[known, missing], IdeaStatus::Archived).await;
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.skipped[0].id, missing);
    }

    #[tokio::test]
    async fn test_generate_for_idea_versions_and_keeps_drafted_status() {
        let store = MemoryStore::new();
        let generator =
            ScriptedGenerator::new(vec![Ok("first".to_string()), Ok("second".to_string())]);
        let idea = seeded_idea(&store, IdeaStatus::Approved).await;

        let first = generate_draft_for_idea(&store, &generator, idea.id, None, false)
            .await
            .unwrap();
        let second = generate_draft_for_idea(&store, &generator, idea.id, None, false)
            .await
            .unwrap();

        let DraftGeneration::Draft { idea: after, draft } = second else {
            panic!("expected a draft");
        };
        assert!(matches!(first, DraftGeneration::Draft { .. }));
        assert_eq!(draft.version, 2);
        assert_eq!(after.status, IdeaStatus::Drafted);
    }

    #[tokio::test]
    async fn test_generate_for_idea_debug_writes_nothing() {
        let store = MemoryStore::new();
        let generator = ScriptedGenerator::ok("unused");
        let idea = seeded_idea(&store, IdeaStatus::Approved).await;

        let result = generate_draft_for_idea(&store, &generator, idea.id, None, true)
            .await
            .unwrap();
        let DraftGeneration::DebugPrompt { prompt } = result else {
            panic!("expected a debug prompt");
        };
        assert!(prompt.contains("Why we stopped discounting"));
        assert_eq!(store.draft_count(), 0);
        assert_eq!(generator.call_count(), 0);
    }
}
