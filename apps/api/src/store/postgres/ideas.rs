use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use super::{parse_column, parse_optional_column, PgStore};
use crate::errors::AppError;
use crate::models::idea::{ContentIdea, IdeaUpdate, NewIdea};
use crate::status::{IdeaStatus, Lifecycle};
use crate::store::IdeaStore;

const IDEA_COLUMNS: &str = "\
    id, user_id, tenant_id, title, description, notes, content_goal, call_to_action, \
    source, source_url, source_excerpt, document_id, status, content_type, has_been_used, \
    pillar_ids, audience_ids, created_at";

#[derive(Debug, FromRow)]
struct IdeaRow {
    id: Uuid,
    user_id: Uuid,
    tenant_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    notes: Option<String>,
    content_goal: Option<String>,
    call_to_action: Option<String>,
    source: String,
    source_url: Option<String>,
    source_excerpt: Option<String>,
    document_id: Option<Uuid>,
    status: String,
    content_type: Option<String>,
    has_been_used: bool,
    pillar_ids: Vec<Uuid>,
    audience_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdeaRow> for ContentIdea {
    type Error = AppError;

    fn try_from(row: IdeaRow) -> Result<Self, Self::Error> {
        let idea = ContentIdea {
            id: row.id,
            user_id: row.user_id,
            tenant_id: row.tenant_id,
            title: row.title,
            description: row.description,
            notes: row.notes,
            content_goal: parse_optional_column(row.content_goal.as_deref())?,
            call_to_action: row.call_to_action,
            source: parse_column(&row.source)?,
            source_url: row.source_url,
            source_excerpt: row.source_excerpt,
            document_id: row.document_id,
            status: parse_column(&row.status)?,
            content_type: parse_optional_column(row.content_type.as_deref())?,
            has_been_used: row.has_been_used,
            pillar_ids: row.pillar_ids,
            audience_ids: row.audience_ids,
            created_at: row.created_at,
        };
        Ok(idea.migrate_legacy_notes())
    }
}

#[async_trait]
impl IdeaStore for PgStore {
    async fn create_idea(&self, idea: NewIdea) -> Result<ContentIdea, AppError> {
        let query = format!(
            "INSERT INTO content_ideas \
                (id, user_id, tenant_id, title, description, notes, content_goal, call_to_action, \
                 source, source_url, source_excerpt, document_id, status, content_type, \
                 has_been_used, pillar_ids, audience_ids) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, false, $15, $16) \
             RETURNING {IDEA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdeaRow>(&query)
            .bind(Uuid::new_v4())
            .bind(idea.user_id)
            .bind(idea.tenant_id)
            .bind(&idea.title)
            .bind(&idea.description)
            .bind(&idea.notes)
            .bind(idea.content_goal.map(|g| g.as_str()))
            .bind(&idea.call_to_action)
            .bind(idea.source.as_str())
            .bind(&idea.source_url)
            .bind(&idea.source_excerpt)
            .bind(idea.document_id)
            .bind(idea.status.as_str())
            .bind(idea.content_type.map(|c| c.as_str()))
            .bind(&idea.pillar_ids)
            .bind(&idea.audience_ids)
            .fetch_one(&self.pool)
            .await?;

        info!(idea_id = %row.id, user_id = %row.user_id, "Inserted content idea");
        row.try_into()
    }

    async fn get_idea(&self, id: Uuid) -> Result<Option<ContentIdea>, AppError> {
        let query = format!("SELECT {IDEA_COLUMNS} FROM content_ideas WHERE id = $1");
        sqlx::query_as::<_, IdeaRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ContentIdea::try_from)
            .transpose()
    }

    async fn list_ideas(
        &self,
        user_id: Uuid,
        status: Option<IdeaStatus>,
    ) -> Result<Vec<ContentIdea>, AppError> {
        let query = format!(
            "SELECT {IDEA_COLUMNS} FROM content_ideas \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, IdeaRow>(&query)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContentIdea::try_from)
            .collect()
    }

    async fn update_idea(&self, id: Uuid, update: IdeaUpdate) -> Result<ContentIdea, AppError> {
        let query = format!(
            "UPDATE content_ideas SET \
                title = COALESCE($2, title), \
                description = CASE WHEN $3 THEN $4 ELSE description END, \
                notes = CASE WHEN $5 THEN $6 ELSE notes END, \
                content_goal = COALESCE($7, content_goal), \
                call_to_action = CASE WHEN $8 THEN $9 ELSE call_to_action END, \
                source_url = CASE WHEN $10 THEN $11 ELSE source_url END, \
                content_type = COALESCE($12, content_type), \
                has_been_used = COALESCE($13, has_been_used), \
                pillar_ids = COALESCE($14, pillar_ids), \
                audience_ids = COALESCE($15, audience_ids) \
             WHERE id = $1 \
             RETURNING {IDEA_COLUMNS}"
        );
        sqlx::query_as::<_, IdeaRow>(&query)
            .bind(id)
            .bind(&update.title)
            .bind(update.description.is_some())
            .bind(update.description.as_ref().and_then(|v| v.as_deref()))
            .bind(update.notes.is_some())
            .bind(update.notes.as_ref().and_then(|v| v.as_deref()))
            .bind(update.content_goal.map(|g| g.as_str()))
            .bind(update.call_to_action.is_some())
            .bind(update.call_to_action.as_ref().and_then(|v| v.as_deref()))
            .bind(update.source_url.is_some())
            .bind(update.source_url.as_ref().and_then(|v| v.as_deref()))
            .bind(update.content_type.map(|c| c.as_str()))
            .bind(update.has_been_used)
            .bind(&update.pillar_ids)
            .bind(&update.audience_ids)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Content idea", id))?
            .try_into()
    }

    async fn set_idea_status(
        &self,
        id: Uuid,
        status: IdeaStatus,
    ) -> Result<ContentIdea, AppError> {
        let query =
            format!("UPDATE content_ideas SET status = $2 WHERE id = $1 RETURNING {IDEA_COLUMNS}");
        sqlx::query_as::<_, IdeaRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Content idea", id))?
            .try_into()
    }

    async fn delete_idea(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM content_ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
