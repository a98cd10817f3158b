use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::generation::classify::{GenerationError, GenerationErrorKind};
use crate::status::StatusTransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    StatusTransition(#[from] StatusTransitionError),

    /// The owning user or tenant could not be determined. Nothing was persisted.
    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Some steps of a multi-step use-case committed before a later step failed.
    #[error("Idea {idea_id} saved, {step} failed: {source}")]
    PartialPipelineFailure {
        idea_id: Uuid,
        step: PipelineStep,
        source: Box<AppError>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The step of save-and-generate that failed after the idea was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Generate,
    SaveDraft,
    AdvanceStatus,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PipelineStep::Generate => "draft generation",
            PipelineStep::SaveDraft => "saving the draft",
            PipelineStep::AdvanceStatus => "advancing the idea to drafted",
        })
    }
}

impl AppError {
    pub fn not_found(entity: &str, id: Uuid) -> Self {
        AppError::NotFound(format!("{entity} {id} not found"))
    }

    /// Wraps `self` as the cause of a failure after idea `idea_id` was saved.
    pub fn after_idea_saved(self, idea_id: Uuid, step: PipelineStep) -> Self {
        AppError::PartialPipelineFailure {
            idea_id,
            step,
            source: Box::new(self),
        }
    }
}

fn generation_status(kind: GenerationErrorKind) -> StatusCode {
    match kind {
        GenerationErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
        GenerationErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                AppError::StatusTransition(e) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_STATUS_TRANSITION",
                    e.to_string(),
                    Some(json!({ "entity": e.entity, "from": e.from, "to": e.to })),
                ),
                AppError::Resolution(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RESOLUTION_ERROR",
                    msg.clone(),
                    None,
                ),
                AppError::Generation(e) => {
                    tracing::error!("Generation error: {e}");
                    (
                        generation_status(e.kind()),
                        "GENERATION_ERROR",
                        e.to_string(),
                        Some(json!({ "kind": e.kind(), "retryable": e.retryable() })),
                    )
                }
                AppError::PartialPipelineFailure {
                    idea_id,
                    step,
                    source,
                } => {
                    tracing::error!(%idea_id, %step, "Partial pipeline failure: {source}");
                    // Storage failures keep their cause private, like `Database` does.
                    let (status, kind, retryable, cause) = match source.as_ref() {
                        AppError::Generation(e) => (
                            generation_status(e.kind()),
                            Some(e.kind()),
                            e.retryable(),
                            e.to_string(),
                        ),
                        _ => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            None,
                            false,
                            "A storage error occurred".to_string(),
                        ),
                    };
                    (
                        status,
                        "PARTIAL_PIPELINE_FAILURE",
                        format!("Idea saved, {step} failed"),
                        Some(json!({
                            "idea_id": idea_id,
                            "step": step,
                            "kind": kind,
                            "retryable": retryable,
                            "cause": cause,
                        })),
                    )
                }
                AppError::Database(e) => {
                    tracing::error!("Database error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        "A database error occurred".to_string(),
                        None,
                    )
                }
                AppError::S3(msg) => {
                    tracing::error!("S3 error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "S3_ERROR",
                        "A storage error occurred".to_string(),
                        None,
                    )
                }
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
