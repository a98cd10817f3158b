use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use super::{parse_column, PgStore};
use crate::errors::AppError;
use crate::models::document::{Document, DocumentStatus, NewDocument, ProcessingStatus};
use crate::store::DocumentStore;

const DOCUMENT_COLUMNS: &str = "\
    id, user_id, tenant_id, title, content, document_type, purpose, status, \
    processing_status, has_ideas, ideas_count, file_key, created_at";

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    user_id: Uuid,
    tenant_id: Option<Uuid>,
    title: String,
    content: String,
    document_type: String,
    purpose: String,
    status: String,
    processing_status: String,
    has_ideas: bool,
    ideas_count: i32,
    file_key: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: row.id,
            user_id: row.user_id,
            tenant_id: row.tenant_id,
            title: row.title,
            content: row.content,
            document_type: parse_column(&row.document_type)?,
            purpose: parse_column(&row.purpose)?,
            status: parse_column(&row.status)?,
            processing_status: parse_column(&row.processing_status)?,
            has_ideas: row.has_ideas,
            ideas_count: row.ideas_count,
            file_key: row.file_key,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_document(&self, document: NewDocument) -> Result<Document, AppError> {
        let query = format!(
            "INSERT INTO documents \
                (id, user_id, tenant_id, title, content, document_type, purpose, status, \
                 processing_status, has_ideas, ideas_count, file_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', 'idle', false, 0, $8) \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(Uuid::new_v4())
            .bind(document.user_id)
            .bind(document.tenant_id)
            .bind(&document.title)
            .bind(&document.content)
            .bind(document.document_type.as_str())
            .bind(document.purpose.as_str())
            .bind(&document.file_key)
            .fetch_one(&self.pool)
            .await?;

        info!(document_id = %row.id, user_id = %row.user_id, "Inserted document");
        row.try_into()
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Document::try_from)
            .transpose()
    }

    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Document::try_from)
            .collect()
    }

    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError> {
        let query =
            format!("UPDATE documents SET status = $2 WHERE id = $1 RETURNING {DOCUMENT_COLUMNS}");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Document", id))?
            .try_into()
    }

    async fn set_processing_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE documents SET processing_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Document", id));
        }
        Ok(())
    }

    async fn claim_processing(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE documents SET processing_status = 'processing' \
             WHERE id = $1 AND processing_status <> 'processing'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn complete_extraction(&self, id: Uuid, ideas_count: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE documents \
             SET processing_status = 'completed', has_ideas = $2 > 0, ideas_count = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(ideas_count)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Document", id));
        }
        Ok(())
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
