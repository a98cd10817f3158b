//! Persistence adapters.
//!
//! One async trait per collection, combined into `ContentStore`. `AppState`
//! carries an `Arc<dyn ContentStore>`; production uses `PgStore`, tests use
//! `memory::MemoryStore`.
//!
//! Writes are single-row and unconditional: concurrent status updates on the
//! same row resolve as last-write-wins in the database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{Document, DocumentStatus, NewDocument, ProcessingStatus};
use crate::models::draft::{ContentDraft, DraftUpdate, NewDraft};
use crate::models::idea::{ContentIdea, IdeaUpdate, NewIdea};
use crate::models::story::{PersonalStory, StoryInput, StoryUpdate};
use crate::models::strategy::{
    AudienceInput, ContentPillar, PillarAudienceLink, PillarInput, TargetAudience,
};
use crate::models::style::WritingStyleProfile;
use crate::models::user::{Tenant, UserProfile, UserProfileInput};
use crate::models::webhook::{WebhookConfiguration, WebhookService};
use crate::models::ContentType;
use crate::status::{DraftStatus, IdeaStatus};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait IdeaStore: Send + Sync {
    async fn create_idea(&self, idea: NewIdea) -> Result<ContentIdea, AppError>;
    async fn get_idea(&self, id: Uuid) -> Result<Option<ContentIdea>, AppError>;
    async fn list_ideas(
        &self,
        user_id: Uuid,
        status: Option<IdeaStatus>,
    ) -> Result<Vec<ContentIdea>, AppError>;
    async fn update_idea(&self, id: Uuid, update: IdeaUpdate) -> Result<ContentIdea, AppError>;
    async fn set_idea_status(&self, id: Uuid, status: IdeaStatus)
        -> Result<ContentIdea, AppError>;
    async fn delete_idea(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn create_draft(&self, draft: NewDraft) -> Result<ContentDraft, AppError>;
    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, AppError>;
    async fn list_drafts_for_idea(&self, idea_id: Uuid) -> Result<Vec<ContentDraft>, AppError>;
    async fn list_drafts_for_user(
        &self,
        user_id: Uuid,
        status: Option<DraftStatus>,
    ) -> Result<Vec<ContentDraft>, AppError>;
    /// Highest version in the (idea, content type) lineage, if any.
    async fn latest_draft_version(
        &self,
        idea_id: Uuid,
        content_type: ContentType,
    ) -> Result<Option<i32>, AppError>;
    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<ContentDraft, AppError>;
    async fn set_draft_status(
        &self,
        id: Uuid,
        status: DraftStatus,
    ) -> Result<ContentDraft, AppError>;
    async fn delete_draft(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts with `status=active`, `processing_status=idle`, `has_ideas=false`, `ideas_count=0`.
    async fn create_document(&self, document: NewDocument) -> Result<Document, AppError>;
    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError>;
    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError>;
    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError>;
    async fn set_processing_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
    ) -> Result<(), AppError>;
    /// Atomically moves the document to `processing` unless it already is.
    /// Returns `false` when another extraction holds it.
    async fn claim_processing(&self, id: Uuid) -> Result<bool, AppError>;
    /// Marks extraction finished: `completed`, `has_ideas = count > 0`, `ideas_count = count`.
    async fn complete_extraction(&self, id: Uuid, ideas_count: i32) -> Result<(), AppError>;
    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Every configuration, across all users.
    async fn list_all_webhook_configs(&self) -> Result<Vec<WebhookConfiguration>, AppError>;
    async fn list_webhook_configs(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebhookConfiguration>, AppError>;
    /// Creates the (user, service) configuration or rotates its token. Always active afterwards.
    async fn upsert_webhook_config(
        &self,
        user_id: Uuid,
        service: WebhookService,
        token: &str,
    ) -> Result<WebhookConfiguration, AppError>;
    async fn set_webhook_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<WebhookConfiguration, AppError>;
    async fn touch_webhook_connected(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn list_pillars(&self, user_id: Uuid) -> Result<Vec<ContentPillar>, AppError>;
    async fn create_pillar(
        &self,
        user_id: Uuid,
        input: PillarInput,
    ) -> Result<ContentPillar, AppError>;
    async fn update_pillar(&self, id: Uuid, input: PillarInput)
        -> Result<ContentPillar, AppError>;
    async fn delete_pillar(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list_audiences(&self, user_id: Uuid) -> Result<Vec<TargetAudience>, AppError>;
    async fn create_audience(
        &self,
        user_id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError>;
    async fn update_audience(
        &self,
        id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError>;
    async fn delete_audience(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list_links(&self, user_id: Uuid) -> Result<Vec<PillarAudienceLink>, AppError>;
    /// Inserts or updates the single link for (pillar, audience).
    async fn upsert_link(
        &self,
        user_id: Uuid,
        pillar_id: Uuid,
        audience_id: Uuid,
        strength: i16,
    ) -> Result<PillarAudienceLink, AppError>;
    async fn delete_link(&self, pillar_id: Uuid, audience_id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError>;
    async fn upsert_user(
        &self,
        user_id: Uuid,
        input: UserProfileInput,
        tenant_id: Option<Uuid>,
    ) -> Result<UserProfile, AppError>;

    async fn find_tenant_by_domain(&self, domain: &str) -> Result<Option<Tenant>, AppError>;
    async fn create_tenant(&self, domain: &str, name: &str) -> Result<Tenant, AppError>;

    async fn get_style_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<WritingStyleProfile>, AppError>;
    async fn save_style_profile(
        &self,
        user_id: Uuid,
        profile: &WritingStyleProfile,
    ) -> Result<(), AppError>;

    async fn list_stories(&self, user_id: Uuid) -> Result<Vec<PersonalStory>, AppError>;
    async fn create_story(&self, user_id: Uuid, input: StoryInput)
        -> Result<PersonalStory, AppError>;
    async fn update_story(&self, id: Uuid, update: StoryUpdate)
        -> Result<PersonalStory, AppError>;
    async fn delete_story(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Every collection the service persists.
pub trait ContentStore:
    IdeaStore + DraftStore + DocumentStore + WebhookStore + StrategyStore + ProfileStore
{
}

impl<T> ContentStore for T where
    T: IdeaStore + DraftStore + DocumentStore + WebhookStore + StrategyStore + ProfileStore
{
}

pub type SharedStore = Arc<dyn ContentStore>;
