//! In-memory `ContentStore` for use-case tests.
//!
//! Mirrors the Postgres adapter's observable behavior (defaults on insert,
//! COALESCE-style updates, upsert keys) and counts status writes so tests can
//! assert that a rejected transition never reached persistence.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{
    Document, DocumentStatus, NewDocument, ProcessingStatus,
};
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
use crate::store::{
    DocumentStore, DraftStore, IdeaStore, ProfileStore, StrategyStore, WebhookStore,
};

#[derive(Default)]
struct Tables {
    ideas: Vec<ContentIdea>,
    drafts: Vec<ContentDraft>,
    documents: Vec<Document>,
    webhooks: Vec<WebhookConfiguration>,
    pillars: Vec<ContentPillar>,
    audiences: Vec<TargetAudience>,
    links: Vec<PillarAudienceLink>,
    users: Vec<UserProfile>,
    tenants: Vec<Tenant>,
    styles: Vec<(Uuid, WritingStyleProfile)>,
    stories: Vec<PersonalStory>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    idea_status_writes: AtomicUsize,
    draft_status_writes: AtomicUsize,
    fail_draft_inserts: AtomicBool,
    fail_idea_status_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn idea_status_writes(&self) -> usize {
        self.idea_status_writes.load(Ordering::SeqCst)
    }

    pub fn draft_status_writes(&self) -> usize {
        self.draft_status_writes.load(Ordering::SeqCst)
    }

    pub fn idea_count(&self) -> usize {
        self.tables.lock().unwrap().ideas.len()
    }

    pub fn draft_count(&self) -> usize {
        self.tables.lock().unwrap().drafts.len()
    }

    /// Makes every later `create_draft` fail as if the pool were exhausted.
    pub fn fail_draft_inserts(&self) {
        self.fail_draft_inserts.store(true, Ordering::SeqCst);
    }

    /// Makes every later `set_idea_status` fail as if the pool were exhausted.
    pub fn fail_idea_status_writes(&self) {
        self.fail_idea_status_writes.store(true, Ordering::SeqCst);
    }

    pub fn document_count(&self) -> usize {
        self.tables.lock().unwrap().documents.len()
    }

    /// Seeds a configuration directly, including shapes the trait cannot create
    /// (for example one without an owner).
    pub fn insert_webhook_config(&self, config: WebhookConfiguration) {
        self.tables.lock().unwrap().webhooks.push(config);
    }
}

fn newest_first<T>(mut rows: Vec<T>) -> Vec<T> {
    rows.reverse();
    rows
}

#[async_trait]
impl IdeaStore for MemoryStore {
    async fn create_idea(&self, idea: NewIdea) -> Result<ContentIdea, AppError> {
        let created = ContentIdea {
            id: Uuid::new_v4(),
            user_id: idea.user_id,
            tenant_id: idea.tenant_id,
            title: idea.title,
            description: idea.description,
            notes: idea.notes,
            content_goal: idea.content_goal,
            call_to_action: idea.call_to_action,
            source: idea.source,
            source_url: idea.source_url,
            source_excerpt: idea.source_excerpt,
            document_id: idea.document_id,
            status: idea.status,
            content_type: idea.content_type,
            has_been_used: false,
            pillar_ids: idea.pillar_ids,
            audience_ids: idea.audience_ids,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().ideas.push(created.clone());
        Ok(created)
    }

    async fn get_idea(&self, id: Uuid) -> Result<Option<ContentIdea>, AppError> {
        let found = {
            let tables = self.tables.lock().unwrap();
            tables.ideas.iter().find(|i| i.id == id).cloned()
        };
        // Yield after reading so concurrent read-validate-write sequences interleave.
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn list_ideas(
        &self,
        user_id: Uuid,
        status: Option<IdeaStatus>,
    ) -> Result<Vec<ContentIdea>, AppError> {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .ideas
            .iter()
            .filter(|i| i.user_id == user_id && status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn update_idea(&self, id: Uuid, update: IdeaUpdate) -> Result<ContentIdea, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let idea = tables
            .ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found("Content idea", id))?;

        if let Some(title) = update.title {
            idea.title = title;
        }
        if let Some(description) = update.description {
            idea.description = description;
        }
        if let Some(notes) = update.notes {
            idea.notes = notes;
        }
        if update.content_goal.is_some() {
            idea.content_goal = update.content_goal;
        }
        if let Some(call_to_action) = update.call_to_action {
            idea.call_to_action = call_to_action;
        }
        if let Some(source_url) = update.source_url {
            idea.source_url = source_url;
        }
        if update.content_type.is_some() {
            idea.content_type = update.content_type;
        }
        if let Some(used) = update.has_been_used {
            idea.has_been_used = used;
        }
        if let Some(ids) = update.pillar_ids {
            idea.pillar_ids = ids;
        }
        if let Some(ids) = update.audience_ids {
            idea.audience_ids = ids;
        }
        Ok(idea.clone())
    }

    async fn set_idea_status(
        &self,
        id: Uuid,
        status: IdeaStatus,
    ) -> Result<ContentIdea, AppError> {
        if self.fail_idea_status_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.idea_status_writes.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        let idea = tables
            .ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found("Content idea", id))?;
        idea.status = status;
        Ok(idea.clone())
    }

    async fn delete_idea(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.ideas.len();
        tables.ideas.retain(|i| i.id != id);
        tables.drafts.retain(|d| d.idea_id != id);
        Ok(tables.ideas.len() < before)
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn create_draft(&self, draft: NewDraft) -> Result<ContentDraft, AppError> {
        if self.fail_draft_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let created = ContentDraft {
            id: Uuid::new_v4(),
            idea_id: draft.idea_id,
            content_type: draft.content_type,
            content_goal: draft.content_goal,
            version: draft.version,
            content: draft.content,
            feedback: draft.feedback,
            status: draft.status,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().drafts.push(created.clone());
        Ok(created)
    }

    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, AppError> {
        let found = {
            let tables = self.tables.lock().unwrap();
            tables.drafts.iter().find(|d| d.id == id).cloned()
        };
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn list_drafts_for_idea(&self, idea_id: Uuid) -> Result<Vec<ContentDraft>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ContentDraft> = tables
            .drafts
            .iter()
            .filter(|d| d.idea_id == idea_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(rows)
    }

    async fn list_drafts_for_user(
        &self,
        user_id: Uuid,
        status: Option<DraftStatus>,
    ) -> Result<Vec<ContentDraft>, AppError> {
        let tables = self.tables.lock().unwrap();
        let owned: Vec<Uuid> = tables
            .ideas
            .iter()
            .filter(|i| i.user_id == user_id)
            .map(|i| i.id)
            .collect();
        let rows = tables
            .drafts
            .iter()
            .filter(|d| owned.contains(&d.idea_id) && status.map_or(true, |s| d.status == s))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn latest_draft_version(
        &self,
        idea_id: Uuid,
        content_type: ContentType,
    ) -> Result<Option<i32>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .drafts
            .iter()
            .filter(|d| d.idea_id == idea_id && d.content_type == content_type)
            .map(|d| d.version)
            .max())
    }

    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<ContentDraft, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let draft = tables
            .drafts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Content draft", id))?;
        if let Some(content) = update.content {
            draft.content = content;
        }
        if update.feedback.is_some() {
            draft.feedback = update.feedback;
        }
        Ok(draft.clone())
    }

    async fn set_draft_status(
        &self,
        id: Uuid,
        status: DraftStatus,
    ) -> Result<ContentDraft, AppError> {
        self.draft_status_writes.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        let draft = tables
            .drafts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Content draft", id))?;
        draft.status = status;
        Ok(draft.clone())
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.drafts.len();
        tables.drafts.retain(|d| d.id != id);
        Ok(tables.drafts.len() < before)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, document: NewDocument) -> Result<Document, AppError> {
        let created = Document {
            id: Uuid::new_v4(),
            user_id: document.user_id,
            tenant_id: document.tenant_id,
            title: document.title,
            content: document.content,
            document_type: document.document_type,
            purpose: document.purpose,
            status: DocumentStatus::Active,
            processing_status: ProcessingStatus::Idle,
            has_ideas: false,
            ideas_count: 0,
            file_key: document.file_key,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().documents.push(created.clone());
        Ok(created)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .documents
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let document = tables
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Document", id))?;
        document.status = status;
        Ok(document.clone())
    }

    async fn set_processing_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(document) = tables.documents.iter_mut().find(|d| d.id == id) {
            document.processing_status = status;
        }
        Ok(())
    }

    async fn claim_processing(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.documents.iter_mut().find(|d| d.id == id) {
            Some(document) if document.processing_status != ProcessingStatus::Processing => {
                document.processing_status = ProcessingStatus::Processing;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_extraction(&self, id: Uuid, ideas_count: i32) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(document) = tables.documents.iter_mut().find(|d| d.id == id) {
            document.processing_status = ProcessingStatus::Completed;
            document.has_ideas = ideas_count > 0;
            document.ideas_count = ideas_count;
        }
        Ok(())
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.documents.len();
        tables.documents.retain(|d| d.id != id);
        Ok(tables.documents.len() < before)
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    async fn list_all_webhook_configs(&self) -> Result<Vec<WebhookConfiguration>, AppError> {
        Ok(self.tables.lock().unwrap().webhooks.clone())
    }

    async fn list_webhook_configs(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebhookConfiguration>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .webhooks
            .iter()
            .filter(|w| w.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn upsert_webhook_config(
        &self,
        user_id: Uuid,
        service: WebhookService,
        token: &str,
    ) -> Result<WebhookConfiguration, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .webhooks
            .iter_mut()
            .find(|w| w.user_id == Some(user_id) && w.service == service)
        {
            existing.webhook_token = token.to_string();
            existing.is_active = true;
            return Ok(existing.clone());
        }
        let created = WebhookConfiguration {
            id: Uuid::new_v4(),
            user_id: Some(user_id),
            service,
            webhook_token: token.to_string(),
            is_active: true,
            last_connected_at: None,
            created_at: Utc::now(),
        };
        tables.webhooks.push(created.clone());
        Ok(created)
    }

    async fn set_webhook_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<WebhookConfiguration, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let config = tables
            .webhooks
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| AppError::not_found("Webhook configuration", id))?;
        config.is_active = active;
        Ok(config.clone())
    }

    async fn touch_webhook_connected(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(config) = tables.webhooks.iter_mut().find(|w| w.id == id) {
            config.last_connected_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl StrategyStore for MemoryStore {
    async fn list_pillars(&self, user_id: Uuid) -> Result<Vec<ContentPillar>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .pillars
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_pillar(
        &self,
        user_id: Uuid,
        input: PillarInput,
    ) -> Result<ContentPillar, AppError> {
        let created = ContentPillar {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().pillars.push(created.clone());
        Ok(created)
    }

    async fn update_pillar(
        &self,
        id: Uuid,
        input: PillarInput,
    ) -> Result<ContentPillar, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let pillar = tables
            .pillars
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Content pillar", id))?;
        pillar.name = input.name;
        pillar.description = input.description;
        Ok(pillar.clone())
    }

    async fn delete_pillar(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.pillars.len();
        tables.pillars.retain(|p| p.id != id);
        tables.links.retain(|l| l.pillar_id != id);
        Ok(tables.pillars.len() < before)
    }

    async fn list_audiences(&self, user_id: Uuid) -> Result<Vec<TargetAudience>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .audiences
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_audience(
        &self,
        user_id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError> {
        let created = TargetAudience {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            description: input.description,
            pain_points: input.pain_points,
            goals: input.goals,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().audiences.push(created.clone());
        Ok(created)
    }

    async fn update_audience(
        &self,
        id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let audience = tables
            .audiences
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("Target audience", id))?;
        audience.name = input.name;
        audience.description = input.description;
        audience.pain_points = input.pain_points;
        audience.goals = input.goals;
        Ok(audience.clone())
    }

    async fn delete_audience(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.audiences.len();
        tables.audiences.retain(|a| a.id != id);
        tables.links.retain(|l| l.audience_id != id);
        Ok(tables.audiences.len() < before)
    }

    async fn list_links(&self, user_id: Uuid) -> Result<Vec<PillarAudienceLink>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_link(
        &self,
        user_id: Uuid,
        pillar_id: Uuid,
        audience_id: Uuid,
        strength: i16,
    ) -> Result<PillarAudienceLink, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .links
            .iter_mut()
            .find(|l| l.pillar_id == pillar_id && l.audience_id == audience_id)
        {
            existing.strength = strength;
            return Ok(existing.clone());
        }
        let created = PillarAudienceLink {
            id: Uuid::new_v4(),
            user_id,
            pillar_id,
            audience_id,
            strength,
            created_at: Utc::now(),
        };
        tables.links.push(created.clone());
        Ok(created)
    }

    async fn delete_link(&self, pillar_id: Uuid, audience_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.links.len();
        tables
            .links
            .retain(|l| !(l.pillar_id == pillar_id && l.audience_id == audience_id));
        Ok(tables.links.len() < before)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        input: UserProfileInput,
        tenant_id: Option<Uuid>,
    ) -> Result<UserProfile, AppError> {
        let mut tables = self.tables.lock().unwrap();
        tables.users.retain(|u| u.id != user_id);
        let user = UserProfile {
            id: user_id,
            email: input.email,
            full_name: input.full_name,
            business_name: input.business_name,
            business_description: input.business_description,
            tenant_id,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_tenant_by_domain(&self, domain: &str) -> Result<Option<Tenant>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tenants.iter().find(|t| t.domain == domain).cloned())
    }

    async fn create_tenant(&self, domain: &str, name: &str) -> Result<Tenant, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.tenants.iter().find(|t| t.domain == domain) {
            return Ok(existing.clone());
        }
        let tenant = Tenant {
            id: Uuid::new_v4(),
            domain: domain.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn get_style_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<WritingStyleProfile>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .styles
            .iter()
            .find(|(owner, _)| *owner == user_id)
            .map(|(_, profile)| profile.clone()))
    }

    async fn save_style_profile(
        &self,
        user_id: Uuid,
        profile: &WritingStyleProfile,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        tables.styles.retain(|(owner, _)| *owner != user_id);
        tables.styles.push((user_id, profile.clone()));
        Ok(())
    }

    async fn list_stories(&self, user_id: Uuid) -> Result<Vec<PersonalStory>, AppError> {
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .stories
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn create_story(
        &self,
        user_id: Uuid,
        input: StoryInput,
    ) -> Result<PersonalStory, AppError> {
        let story = PersonalStory {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            content: input.content,
            tags: input.tags,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().stories.push(story.clone());
        Ok(story)
    }

    async fn update_story(
        &self,
        id: Uuid,
        update: StoryUpdate,
    ) -> Result<PersonalStory, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let story = tables
            .stories
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("Personal story", id))?;
        if let Some(title) = update.title {
            story.title = title;
        }
        if let Some(content) = update.content {
            story.content = content;
        }
        if let Some(tags) = update.tags {
            story.tags = tags;
        }
        Ok(story.clone())
    }

    async fn delete_story(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.stories.len();
        tables.stories.retain(|s| s.id != id);
        Ok(tables.stories.len() < before)
    }
}
