use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::client::{generate_preview, GenerationOutcome};
use crate::models::draft::{ContentDraft, DraftUpdate};
use crate::models::idea::{ContentIdea, IdeaUpdate};
use crate::models::ContentType;
use crate::pipeline::context::GenerationContext;
use crate::pipeline::drafts::{
    batch_update_draft_status, regenerate, update_draft_status, RegenerateRequest,
};
use crate::pipeline::ideas::{
    batch_update_idea_status, create_idea, debug_prompt_for_form, generate_draft_for_idea,
    save_and_generate, update_idea_status, DraftGeneration, IdeaForm, SavedWithDraft,
};
use crate::state::AppState;
use crate::status::{BatchOutcome, DraftStatus, IdeaStatus};
use crate::store::{DraftStore, IdeaStore};

#[derive(Deserialize)]
pub struct IdeaListQuery {
    pub user_id: Uuid,
    pub status: Option<IdeaStatus>,
}

#[derive(Deserialize)]
pub struct DraftListQuery {
    pub user_id: Uuid,
    pub status: Option<DraftStatus>,
}

#[derive(Deserialize)]
pub struct CreateIdeaRequest {
    #[serde(flatten)]
    pub form: IdeaForm,
    /// `approved` for the quick-add path; defaults to `unreviewed`.
    pub initial_status: Option<IdeaStatus>,
}

#[derive(Deserialize)]
pub struct StatusChange<S> {
    pub status: S,
}

#[derive(Deserialize)]
pub struct BatchStatusChange<S> {
    pub ids: Vec<Uuid>,
    pub status: S,
}

#[derive(Deserialize)]
pub struct GenerateDraftRequest {
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub user_id: Uuid,
    pub content_type: ContentType,
    #[serde(default)]
    pub debug: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Ideas
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/ideas
pub async fn handle_list_ideas(
    State(state): State<AppState>,
    Query(params): Query<IdeaListQuery>,
) -> Result<Json<Vec<ContentIdea>>, AppError> {
    let ideas = state.store.list_ideas(params.user_id, params.status).await?;
    Ok(Json(ideas))
}

/// POST /api/v1/ideas
pub async fn handle_create_idea(
    State(state): State<AppState>,
    Json(req): Json<CreateIdeaRequest>,
) -> Result<(StatusCode, Json<ContentIdea>), AppError> {
    let initial = req.initial_status.unwrap_or(IdeaStatus::Unreviewed);
    let idea = create_idea(state.store.as_ref(), req.form, initial).await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

/// POST /api/v1/ideas/generate
pub async fn handle_save_and_generate(
    State(state): State<AppState>,
    Json(form): Json<IdeaForm>,
) -> Result<(StatusCode, Json<SavedWithDraft>), AppError> {
    let saved = save_and_generate(state.store.as_ref(), state.generator.as_ref(), form).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// POST /api/v1/ideas/prompt
pub async fn handle_debug_prompt(
    State(state): State<AppState>,
    Json(form): Json<IdeaForm>,
) -> Result<Json<Value>, AppError> {
    let prompt = debug_prompt_for_form(state.store.as_ref(), &form).await?;
    Ok(Json(json!({ "prompt": prompt })))
}

/// POST /api/v1/ideas/batch/status
pub async fn handle_batch_idea_status(
    State(state): State<AppState>,
    Json(req): Json<BatchStatusChange<IdeaStatus>>,
) -> Json<BatchOutcome> {
    Json(batch_update_idea_status(state.store.as_ref(), &req.ids, req.status).await)
}

/// GET /api/v1/ideas/:id
pub async fn handle_get_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentIdea>, AppError> {
    let idea = state
        .store
        .get_idea(id)
        .await?
        .ok_or_else(|| AppError::not_found("Content idea", id))?;
    Ok(Json(idea))
}

/// PATCH /api/v1/ideas/:id
pub async fn handle_update_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<IdeaUpdate>,
) -> Result<Json<ContentIdea>, AppError> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Idea title cannot be empty".to_string()));
    }
    Ok(Json(state.store.update_idea(id, update).await?))
}

/// DELETE /api/v1/ideas/:id
pub async fn handle_delete_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_idea(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Content idea", id))
    }
}

/// PATCH /api/v1/ideas/:id/status
pub async fn handle_update_idea_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChange<IdeaStatus>>,
) -> Result<Json<ContentIdea>, AppError> {
    Ok(Json(
        update_idea_status(state.store.as_ref(), id, req.status).await?,
    ))
}

/// GET /api/v1/ideas/:id/drafts
pub async fn handle_list_idea_drafts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ContentDraft>>, AppError> {
    Ok(Json(state.store.list_drafts_for_idea(id).await?))
}

/// POST /api/v1/ideas/:id/drafts
pub async fn handle_generate_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GenerateDraftRequest>,
) -> Result<Json<DraftGeneration>, AppError> {
    let result = generate_draft_for_idea(
        state.store.as_ref(),
        state.generator.as_ref(),
        id,
        req.content_type,
        req.debug,
    )
    .await?;
    Ok(Json(result))
}

// ────────────────────────────────────────────────────────────────────────────
// Drafts
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/drafts
pub async fn handle_list_drafts(
    State(state): State<AppState>,
    Query(params): Query<DraftListQuery>,
) -> Result<Json<Vec<ContentDraft>>, AppError> {
    let drafts = state
        .store
        .list_drafts_for_user(params.user_id, params.status)
        .await?;
    Ok(Json(drafts))
}

/// GET /api/v1/drafts/:id
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentDraft>, AppError> {
    let draft = state
        .store
        .get_draft(id)
        .await?
        .ok_or_else(|| AppError::not_found("Content draft", id))?;
    Ok(Json(draft))
}

/// PATCH /api/v1/drafts/:id
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<ContentDraft>, AppError> {
    Ok(Json(state.store.update_draft(id, update).await?))
}

/// DELETE /api/v1/drafts/:id
pub async fn handle_delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_draft(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Content draft", id))
    }
}

/// PATCH /api/v1/drafts/:id/status
pub async fn handle_update_draft_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChange<DraftStatus>>,
) -> Result<Json<ContentDraft>, AppError> {
    Ok(Json(
        update_draft_status(state.store.as_ref(), id, req.status).await?,
    ))
}

/// POST /api/v1/drafts/:id/regenerate
pub async fn handle_regenerate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegenerateRequest>,
) -> Result<(StatusCode, Json<ContentDraft>), AppError> {
    let draft = regenerate(
        state.store.as_ref(),
        state.generator.as_ref(),
        id,
        req.instructions.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// POST /api/v1/drafts/batch/status
pub async fn handle_batch_draft_status(
    State(state): State<AppState>,
    Json(req): Json<BatchStatusChange<DraftStatus>>,
) -> Json<BatchOutcome> {
    Json(batch_update_draft_status(state.store.as_ref(), &req.ids, req.status).await)
}

// ────────────────────────────────────────────────────────────────────────────
// Style preview
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<GenerationOutcome>, AppError> {
    let ctx = GenerationContext::load(state.store.as_ref(), req.user_id, &[], &[]).await?;
    let outcome = generate_preview(
        state.generator.as_ref(),
        &ctx.business(),
        ctx.style.as_ref(),
        req.content_type,
        req.user_id,
        ctx.tenant_id(),
        req.debug,
    )
    .await?;
    Ok(Json(outcome))
}
