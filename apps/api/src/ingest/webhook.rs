//! Transcript delivery from meeting-recorder webhooks.
//!
//! A transcript is only stored once its owner is known: either the payload
//! names the user, or `webhookId` matches a configuration that has one.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::extraction::{start_extraction, IdeaExtractor};
use crate::models::document::{Document, NewDocument, ProcessingStatus};
use crate::store::{ContentStore, DocumentStore, ProfileStore, SharedStore, WebhookStore};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptWebhookPayload {
    pub transcript: String,
    pub title: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub webhook_id: Option<String>,
}

impl TranscriptWebhookPayload {
    /// Type mismatches and missing required fields are validation errors.
    pub fn parse(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid transcript payload: {e}")))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptAccepted {
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub processing_status: ProcessingStatus,
}

/// Who owns a delivered transcript, and through which configuration if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOwner {
    pub user_id: Uuid,
    pub webhook_config_id: Option<Uuid>,
}

/// `userId` wins when present. Otherwise `webhookId` must equal the id of a
/// stored configuration exactly, and that configuration must have an owner.
pub async fn resolve_owner(
    store: &dyn ContentStore,
    payload: &TranscriptWebhookPayload,
) -> Result<ResolvedOwner, AppError> {
    if let Some(raw) = payload.user_id.as_deref() {
        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Validation(format!("userId '{raw}' is not a valid id")))?;
        return Ok(ResolvedOwner {
            user_id,
            webhook_config_id: None,
        });
    }

    let webhook_id = payload.webhook_id.as_deref().ok_or_else(|| {
        AppError::Resolution("Payload has neither userId nor webhookId".to_string())
    })?;

    let configs = store.list_all_webhook_configs().await?;
    let config = configs
        .iter()
        .find(|c| c.id.to_string() == webhook_id)
        .ok_or_else(|| {
            AppError::Resolution(format!("No webhook configuration matches '{webhook_id}'"))
        })?;
    let user_id = config.user_id.ok_or_else(|| {
        AppError::Resolution(format!("Webhook configuration {} has no owner", config.id))
    })?;

    Ok(ResolvedOwner {
        user_id,
        webhook_config_id: Some(config.id),
    })
}

/// Validates, resolves the owner, persists the transcript as an idle document,
/// and starts extraction in the background. Returns as soon as the row exists.
pub async fn process_transcript_webhook(
    store: SharedStore,
    extractor: Arc<dyn IdeaExtractor>,
    body: Value,
) -> Result<Document, AppError> {
    let payload = TranscriptWebhookPayload::parse(body)?;

    let owner = match resolve_owner(store.as_ref(), &payload).await {
        Ok(owner) => owner,
        Err(e) => {
            warn!(webhook_id = ?payload.webhook_id, "Transcript webhook rejected: {e}");
            return Err(e);
        }
    };

    if let Some(config_id) = owner.webhook_config_id {
        store.touch_webhook_connected(config_id, Utc::now()).await?;
    }

    let tenant_id = store
        .get_user(owner.user_id)
        .await?
        .and_then(|user| user.tenant_id);
    let document = store
        .create_document(NewDocument::transcript(
            owner.user_id,
            tenant_id,
            &payload.title,
            &payload.transcript,
        ))
        .await?;

    info!(
        document_id = %document.id,
        user_id = %owner.user_id,
        chars = payload.transcript.len(),
        "Stored webhook transcript, starting idea extraction"
    );
    start_extraction(store, extractor, document.clone()).await?;

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::extraction::testing::StaticExtractor;
    use crate::models::document::{DocumentPurpose, DocumentType};
    use crate::models::webhook::{WebhookConfiguration, WebhookService};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn extractor() -> Arc<dyn IdeaExtractor> {
        Arc::new(StaticExtractor::ideas(&["Onboarding in a week"]))
    }

    #[tokio::test]
    async fn test_mistyped_fields_are_validation_errors() {
        let store = Arc::new(MemoryStore::new());
        let err = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({ "transcript": 42, "title": "Sync", "userId": Uuid::new_v4() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = process_transcript_webhook(store.clone(), extractor(), json!({ "transcript": "t" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_webhook_id_is_resolution_error_and_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_webhook_config(Uuid::new_v4(), WebhookService::Otter, "tok")
            .await
            .unwrap();

        let err = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({ "transcript": "t", "title": "Sync", "webhookId": Uuid::new_v4().to_string() }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Resolution(_)));
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_ownerless_configuration_is_resolution_error() {
        let store = Arc::new(MemoryStore::new());
        let config_id = Uuid::new_v4();
        store.insert_webhook_config(WebhookConfiguration {
            id: config_id,
            user_id: None,
            service: WebhookService::Fathom,
            webhook_token: "tok".to_string(),
            is_active: true,
            last_connected_at: None,
            created_at: Utc::now(),
        });

        let err = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({ "transcript": "t", "title": "Sync", "webhookId": config_id.to_string() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Resolution(_)));
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_owner_hints_is_resolution_error() {
        let store = Arc::new(MemoryStore::new());
        let err = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({ "transcript": "t", "title": "Sync" }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Resolution(_)));
    }

    #[tokio::test]
    async fn test_matching_webhook_stores_idle_transcript_then_completes() {
        let store = Arc::new(MemoryStore::new());
        let owner = Uuid::new_v4();
        let config = store
            .upsert_webhook_config(owner, WebhookService::Fireflies, "tok")
            .await
            .unwrap();

        let document = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({
                "transcript": "We cut onboarding from a month to a week.",
                "title": "Weekly sync",
                "webhookId": config.id.to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(document.user_id, owner);
        assert_eq!(document.document_type, DocumentType::Transcript);
        assert_eq!(document.purpose, DocumentPurpose::ContentIdea);
        assert_eq!(document.processing_status, ProcessingStatus::Idle);
        assert!(!document.has_ideas);
        assert_eq!(document.ideas_count, 0);

        let touched = store.list_webhook_configs(owner).await.unwrap();
        assert!(touched[0].last_connected_at.is_some());

        let mut status = ProcessingStatus::Idle;
        for _ in 0..100 {
            status = store
                .get_document(document.id)
                .await
                .unwrap()
                .unwrap()
                .processing_status;
            if matches!(status, ProcessingStatus::Completed | ProcessingStatus::Failed) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(status, ProcessingStatus::Completed);
    }

    #[tokio::test]
    async fn test_explicit_user_id_skips_configuration_lookup() {
        let store = Arc::new(MemoryStore::new());
        let owner = Uuid::new_v4();
        let document = process_transcript_webhook(
            store.clone(),
            extractor(),
            json!({ "transcript": "t", "title": "Sync", "userId": owner.to_string() }),
        )
        .await
        .unwrap();
        assert_eq!(document.user_id, owner);
    }
}
