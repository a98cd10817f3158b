use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::documents::{
    create_pasted_document, trigger_extraction, upload_document, DocumentInput, UploadRequest,
    UploadedFile,
};
use crate::ingest::webhook::{process_transcript_webhook, TranscriptAccepted};
use crate::models::document::{Document, DocumentPurpose, DocumentStatus, DocumentType};
use crate::models::webhook::{generate_webhook_token, WebhookConfiguration, WebhookService};
use crate::state::AppState;
use crate::store::{DocumentStore, WebhookStore};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct DocumentStatusChange {
    pub status: DocumentStatus,
}

#[derive(Deserialize)]
pub struct WebhookConfigRequest {
    pub user_id: Uuid,
    pub service: WebhookService,
}

#[derive(Deserialize)]
pub struct WebhookActiveChange {
    pub is_active: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Transcript webhook
// ────────────────────────────────────────────────────────────────────────────

/// POST /webhook/transcript
pub async fn handle_transcript_webhook(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<TranscriptAccepted>), AppError> {
    let document =
        process_transcript_webhook(state.store.clone(), state.extractor.clone(), body).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TranscriptAccepted {
            document_id: document.id,
            user_id: document.user_id,
            processing_status: document.processing_status,
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Documents
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(state.store.list_documents(params.user_id).await?))
}

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(input): Json<DocumentInput>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let document = create_pasted_document(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid value '{value}' for field '{name}'")))
}

/// POST /api/v1/documents/upload
///
/// Multipart fields: `file` (required), `user_id` (required), `title`,
/// `document_type` (default `other`), `purpose` (default `content_idea`).
pub async fn handle_upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let mut file = None;
    let mut user_id = None;
    let mut title = None;
    let mut document_type = DocumentType::Other;
    let mut purpose = DocumentPurpose::ContentIdea;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > state.config.max_upload_bytes {
                    return Err(AppError::Validation(format!(
                        "File exceeds the {} byte upload limit",
                        state.config.max_upload_bytes
                    )));
                }
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "user_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                user_id = Some(parse_field::<Uuid>(&name, &text)?);
            }
            "title" => title = Some(field.text().await.map_err(multipart_error)?),
            "document_type" => {
                let text = field.text().await.map_err(multipart_error)?;
                document_type = parse_field(&name, &text)?;
            }
            "purpose" => {
                let text = field.text().await.map_err(multipart_error)?;
                purpose = parse_field(&name, &text)?;
            }
            _ => {}
        }
    }

    let upload = UploadRequest {
        user_id: user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?,
        title,
        document_type,
        purpose,
        file: file.ok_or_else(|| AppError::Validation("file is required".to_string()))?,
    };
    let document = upload_document(
        state.store.as_ref(),
        &state.s3,
        &state.config.s3_bucket,
        upload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let document = state
        .store
        .get_document(id)
        .await?
        .ok_or_else(|| AppError::not_found("Document", id))?;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_document(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Document", id))
    }
}

/// PATCH /api/v1/documents/:id/status
pub async fn handle_set_document_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DocumentStatusChange>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(state.store.set_document_status(id, req.status).await?))
}

/// POST /api/v1/documents/:id/extract
pub async fn handle_extract_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let document = trigger_extraction(state.store.clone(), state.extractor.clone(), id).await?;
    Ok((StatusCode::ACCEPTED, Json(document)))
}

// ────────────────────────────────────────────────────────────────────────────
// Webhook configurations
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/webhooks
pub async fn handle_list_webhooks(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<WebhookConfiguration>>, AppError> {
    Ok(Json(state.store.list_webhook_configs(params.user_id).await?))
}

/// POST /api/v1/webhooks
///
/// Creates the (user, service) configuration, or rotates its token if it exists.
pub async fn handle_upsert_webhook(
    State(state): State<AppState>,
    Json(req): Json<WebhookConfigRequest>,
) -> Result<Json<WebhookConfiguration>, AppError> {
    let token = generate_webhook_token();
    let config = state
        .store
        .upsert_webhook_config(req.user_id, req.service, &token)
        .await?;
    Ok(Json(config))
}

/// PATCH /api/v1/webhooks/:id
pub async fn handle_set_webhook_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<WebhookActiveChange>,
) -> Result<Json<WebhookConfiguration>, AppError> {
    Ok(Json(state.store.set_webhook_active(id, req.is_active).await?))
}
