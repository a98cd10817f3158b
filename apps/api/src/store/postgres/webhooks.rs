use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use super::{parse_column, PgStore};
use crate::errors::AppError;
use crate::models::webhook::{WebhookConfiguration, WebhookService};
use crate::store::WebhookStore;

const WEBHOOK_COLUMNS: &str =
    "id, user_id, service, webhook_token, is_active, last_connected_at, created_at";

#[derive(Debug, FromRow)]
struct WebhookRow {
    id: Uuid,
    user_id: Option<Uuid>,
    service: String,
    webhook_token: String,
    is_active: bool,
    last_connected_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WebhookRow> for WebhookConfiguration {
    type Error = AppError;

    fn try_from(row: WebhookRow) -> Result<Self, Self::Error> {
        Ok(WebhookConfiguration {
            id: row.id,
            user_id: row.user_id,
            service: parse_column(&row.service)?,
            webhook_token: row.webhook_token,
            is_active: row.is_active,
            last_connected_at: row.last_connected_at,
            created_at: row.created_at,
        })
    }
}

fn into_configs(rows: Vec<WebhookRow>) -> Result<Vec<WebhookConfiguration>, AppError> {
    rows.into_iter().map(WebhookConfiguration::try_from).collect()
}

#[async_trait]
impl WebhookStore for PgStore {
    async fn list_all_webhook_configs(&self) -> Result<Vec<WebhookConfiguration>, AppError> {
        let query = format!("SELECT {WEBHOOK_COLUMNS} FROM webhook_configurations");
        let rows = sqlx::query_as::<_, WebhookRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        into_configs(rows)
    }

    async fn list_webhook_configs(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WebhookConfiguration>, AppError> {
        let query = format!(
            "SELECT {WEBHOOK_COLUMNS} FROM webhook_configurations \
             WHERE user_id = $1 ORDER BY service"
        );
        let rows = sqlx::query_as::<_, WebhookRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        into_configs(rows)
    }

    async fn upsert_webhook_config(
        &self,
        user_id: Uuid,
        service: WebhookService,
        token: &str,
    ) -> Result<WebhookConfiguration, AppError> {
        let query = format!(
            "INSERT INTO webhook_configurations (id, user_id, service, webhook_token, is_active) \
             VALUES ($1, $2, $3, $4, true) \
             ON CONFLICT (user_id, service) \
             DO UPDATE SET webhook_token = EXCLUDED.webhook_token, is_active = true \
             RETURNING {WEBHOOK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, WebhookRow>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(service.as_str())
            .bind(token)
            .fetch_one(&self.pool)
            .await?;

        info!(webhook_id = %row.id, %user_id, service = service.as_str(), "Upserted webhook configuration");
        row.try_into()
    }

    async fn set_webhook_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<WebhookConfiguration, AppError> {
        let query = format!(
            "UPDATE webhook_configurations SET is_active = $2 WHERE id = $1 \
             RETURNING {WEBHOOK_COLUMNS}"
        );
        sqlx::query_as::<_, WebhookRow>(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Webhook configuration", id))?
            .try_into()
    }

    async fn touch_webhook_connected(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE webhook_configurations SET last_connected_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
