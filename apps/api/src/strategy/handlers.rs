use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::strategy::{
    AudienceInput, ContentPillar, PillarAudienceLink, PillarInput, TargetAudience,
};
use crate::state::AppState;
use crate::store::StrategyStore;
use crate::strategy::links::{set_link, LinkChange, LinkRequest};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreatePillar {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: PillarInput,
}

#[derive(Deserialize)]
pub struct CreateAudience {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: AudienceInput,
}

fn require_name(name: &str, entity: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(format!("{entity} name is required")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Pillars
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/pillars
pub async fn handle_list_pillars(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ContentPillar>>, AppError> {
    Ok(Json(state.store.list_pillars(params.user_id).await?))
}

/// POST /api/v1/pillars
pub async fn handle_create_pillar(
    State(state): State<AppState>,
    Json(req): Json<CreatePillar>,
) -> Result<(StatusCode, Json<ContentPillar>), AppError> {
    require_name(&req.input.name, "Pillar")?;
    let pillar = state.store.create_pillar(req.user_id, req.input).await?;
    Ok((StatusCode::CREATED, Json(pillar)))
}

/// PATCH /api/v1/pillars/:id
pub async fn handle_update_pillar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PillarInput>,
) -> Result<Json<ContentPillar>, AppError> {
    require_name(&input.name, "Pillar")?;
    Ok(Json(state.store.update_pillar(id, input).await?))
}

/// DELETE /api/v1/pillars/:id
pub async fn handle_delete_pillar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_pillar(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Content pillar", id))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Audiences
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/audiences
pub async fn handle_list_audiences(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<TargetAudience>>, AppError> {
    Ok(Json(state.store.list_audiences(params.user_id).await?))
}

/// POST /api/v1/audiences
pub async fn handle_create_audience(
    State(state): State<AppState>,
    Json(req): Json<CreateAudience>,
) -> Result<(StatusCode, Json<TargetAudience>), AppError> {
    require_name(&req.input.name, "Audience")?;
    let audience = state.store.create_audience(req.user_id, req.input).await?;
    Ok((StatusCode::CREATED, Json(audience)))
}

/// PATCH /api/v1/audiences/:id
pub async fn handle_update_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AudienceInput>,
) -> Result<Json<TargetAudience>, AppError> {
    require_name(&input.name, "Audience")?;
    Ok(Json(state.store.update_audience(id, input).await?))
}

/// DELETE /api/v1/audiences/:id
pub async fn handle_delete_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_audience(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Target audience", id))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Links
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/pillar-audience-links
pub async fn handle_list_links(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<PillarAudienceLink>>, AppError> {
    Ok(Json(state.store.list_links(params.user_id).await?))
}

/// PUT /api/v1/pillar-audience-links
pub async fn handle_set_link(
    State(state): State<AppState>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<LinkChange>, AppError> {
    Ok(Json(set_link(state.store.as_ref(), req).await?))
}
