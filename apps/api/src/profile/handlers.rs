use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::story::{PersonalStory, StoryInput, StoryUpdate};
use crate::models::style::WritingStyleProfile;
use crate::models::user::{UserProfile, UserProfileInput};
use crate::profile::tenancy::save_profile;
use crate::state::AppState;
use crate::store::ProfileStore;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SaveProfile {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: UserProfileInput,
}

#[derive(Deserialize)]
pub struct SaveStyleProfile {
    pub user_id: Uuid,
    pub profile: WritingStyleProfile,
}

#[derive(Deserialize)]
pub struct CreateStory {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: StoryInput,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .store
        .get_user(params.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User profile", params.user_id))?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(req): Json<SaveProfile>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        save_profile(state.store.as_ref(), req.user_id, req.input).await?,
    ))
}

/// GET /api/v1/style-profile
pub async fn handle_get_style_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<WritingStyleProfile>, AppError> {
    let profile = state
        .store
        .get_style_profile(params.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Writing style profile", params.user_id))?;
    Ok(Json(profile))
}

/// PUT /api/v1/style-profile
pub async fn handle_save_style_profile(
    State(state): State<AppState>,
    Json(req): Json<SaveStyleProfile>,
) -> Result<Json<WritingStyleProfile>, AppError> {
    state
        .store
        .save_style_profile(req.user_id, &req.profile)
        .await?;
    tracing::info!(user_id = %req.user_id, "Saved writing style profile");
    Ok(Json(req.profile))
}

/// GET /api/v1/stories
pub async fn handle_list_stories(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<PersonalStory>>, AppError> {
    Ok(Json(state.store.list_stories(params.user_id).await?))
}

/// POST /api/v1/stories
pub async fn handle_create_story(
    State(state): State<AppState>,
    Json(req): Json<CreateStory>,
) -> Result<(StatusCode, Json<PersonalStory>), AppError> {
    if req.input.title.trim().is_empty() || req.input.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Story title and content are required".to_string(),
        ));
    }
    let story = state.store.create_story(req.user_id, req.input).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

/// PATCH /api/v1/stories/:id
pub async fn handle_update_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StoryUpdate>,
) -> Result<Json<PersonalStory>, AppError> {
    Ok(Json(state.store.update_story(id, update).await?))
}

/// DELETE /api/v1/stories/:id
pub async fn handle_delete_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_story(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Personal story", id))
    }
}
