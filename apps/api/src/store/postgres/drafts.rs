use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use super::{parse_column, parse_optional_column, PgStore};
use crate::errors::AppError;
use crate::models::draft::{ContentDraft, DraftUpdate, NewDraft};
use crate::models::ContentType;
use crate::status::{DraftStatus, Lifecycle};
use crate::store::DraftStore;

const DRAFT_COLUMNS: &str = "\
    id, idea_id, content_type, content_goal, version, content, feedback, status, created_at";

const DRAFT_COLUMNS_QUALIFIED: &str = "\
    d.id, d.idea_id, d.content_type, d.content_goal, d.version, d.content, d.feedback, \
    d.status, d.created_at";

#[derive(Debug, FromRow)]
struct DraftRow {
    id: Uuid,
    idea_id: Uuid,
    content_type: String,
    content_goal: Option<String>,
    version: i32,
    content: String,
    feedback: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DraftRow> for ContentDraft {
    type Error = AppError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        Ok(ContentDraft {
            id: row.id,
            idea_id: row.idea_id,
            content_type: parse_column(&row.content_type)?,
            content_goal: parse_optional_column(row.content_goal.as_deref())?,
            version: row.version,
            content: row.content,
            feedback: row.feedback,
            status: parse_column(&row.status)?,
            created_at: row.created_at,
        })
    }
}

fn into_drafts(rows: Vec<DraftRow>) -> Result<Vec<ContentDraft>, AppError> {
    rows.into_iter().map(ContentDraft::try_from).collect()
}

#[async_trait]
impl DraftStore for PgStore {
    async fn create_draft(&self, draft: NewDraft) -> Result<ContentDraft, AppError> {
        let query = format!(
            "INSERT INTO content_drafts \
                (id, idea_id, content_type, content_goal, version, content, feedback, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {DRAFT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DraftRow>(&query)
            .bind(Uuid::new_v4())
            .bind(draft.idea_id)
            .bind(draft.content_type.as_str())
            .bind(draft.content_goal.map(|g| g.as_str()))
            .bind(draft.version)
            .bind(&draft.content)
            .bind(&draft.feedback)
            .bind(draft.status.as_str())
            .fetch_one(&self.pool)
            .await?;

        info!(
            draft_id = %row.id,
            idea_id = %row.idea_id,
            version = row.version,
            "Inserted content draft"
        );
        row.try_into()
    }

    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, AppError> {
        let query = format!("SELECT {DRAFT_COLUMNS} FROM content_drafts WHERE id = $1");
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ContentDraft::try_from)
            .transpose()
    }

    async fn list_drafts_for_idea(&self, idea_id: Uuid) -> Result<Vec<ContentDraft>, AppError> {
        let query = format!(
            "SELECT {DRAFT_COLUMNS} FROM content_drafts \
             WHERE idea_id = $1 ORDER BY content_type, version DESC"
        );
        let rows = sqlx::query_as::<_, DraftRow>(&query)
            .bind(idea_id)
            .fetch_all(&self.pool)
            .await?;
        into_drafts(rows)
    }

    async fn list_drafts_for_user(
        &self,
        user_id: Uuid,
        status: Option<DraftStatus>,
    ) -> Result<Vec<ContentDraft>, AppError> {
        let query = format!(
            "SELECT {DRAFT_COLUMNS_QUALIFIED} FROM content_drafts d \
             JOIN content_ideas i ON i.id = d.idea_id \
             WHERE i.user_id = $1 AND ($2::text IS NULL OR d.status = $2) \
             ORDER BY d.created_at DESC"
        );
        let rows = sqlx::query_as::<_, DraftRow>(&query)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        into_drafts(rows)
    }

    async fn latest_draft_version(
        &self,
        idea_id: Uuid,
        content_type: ContentType,
    ) -> Result<Option<i32>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT MAX(version) FROM content_drafts WHERE idea_id = $1 AND content_type = $2",
        )
        .bind(idea_id)
        .bind(content_type.as_str())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<ContentDraft, AppError> {
        let query = format!(
            "UPDATE content_drafts SET \
                content = COALESCE($2, content), \
                feedback = COALESCE($3, feedback) \
             WHERE id = $1 RETURNING {DRAFT_COLUMNS}"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .bind(&update.content)
            .bind(&update.feedback)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Content draft", id))?
            .try_into()
    }

    async fn set_draft_status(
        &self,
        id: Uuid,
        status: DraftStatus,
    ) -> Result<ContentDraft, AppError> {
        let query = format!(
            "UPDATE content_drafts SET status = $2 WHERE id = $1 RETURNING {DRAFT_COLUMNS}"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Content draft", id))?
            .try_into()
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM content_drafts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
