use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::errors::AppError;
use crate::models::strategy::{
    AudienceInput, ContentPillar, PillarAudienceLink, PillarInput, TargetAudience,
};
use crate::store::StrategyStore;

// Model structs map 1:1 onto these tables, so they are read with FromRow directly.

const PILLAR_COLUMNS: &str = "id, user_id, name, description, created_at";
const AUDIENCE_COLUMNS: &str = "id, user_id, name, description, pain_points, goals, created_at";
const LINK_COLUMNS: &str = "id, user_id, pillar_id, audience_id, strength, created_at";

#[async_trait]
impl StrategyStore for PgStore {
    async fn list_pillars(&self, user_id: Uuid) -> Result<Vec<ContentPillar>, AppError> {
        let query = format!(
            "SELECT {PILLAR_COLUMNS} FROM content_pillars WHERE user_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, ContentPillar>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_pillar(
        &self,
        user_id: Uuid,
        input: PillarInput,
    ) -> Result<ContentPillar, AppError> {
        let query = format!(
            "INSERT INTO content_pillars (id, user_id, name, description) \
             VALUES ($1, $2, $3, $4) RETURNING {PILLAR_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ContentPillar>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_pillar(
        &self,
        id: Uuid,
        input: PillarInput,
    ) -> Result<ContentPillar, AppError> {
        let query = format!(
            "UPDATE content_pillars SET name = $2, description = $3 WHERE id = $1 \
             RETURNING {PILLAR_COLUMNS}"
        );
        sqlx::query_as::<_, ContentPillar>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Content pillar", id))
    }

    async fn delete_pillar(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM content_pillars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_audiences(&self, user_id: Uuid) -> Result<Vec<TargetAudience>, AppError> {
        let query = format!(
            "SELECT {AUDIENCE_COLUMNS} FROM target_audiences WHERE user_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, TargetAudience>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_audience(
        &self,
        user_id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError> {
        let query = format!(
            "INSERT INTO target_audiences (id, user_id, name, description, pain_points, goals) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {AUDIENCE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, TargetAudience>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.pain_points)
            .bind(&input.goals)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_audience(
        &self,
        id: Uuid,
        input: AudienceInput,
    ) -> Result<TargetAudience, AppError> {
        let query = format!(
            "UPDATE target_audiences \
             SET name = $2, description = $3, pain_points = $4, goals = $5 \
             WHERE id = $1 RETURNING {AUDIENCE_COLUMNS}"
        );
        sqlx::query_as::<_, TargetAudience>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.pain_points)
            .bind(&input.goals)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Target audience", id))
    }

    async fn delete_audience(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM target_audiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_links(&self, user_id: Uuid) -> Result<Vec<PillarAudienceLink>, AppError> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM pillar_audience_links WHERE user_id = $1 \
             ORDER BY pillar_id, audience_id"
        );
        Ok(sqlx::query_as::<_, PillarAudienceLink>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn upsert_link(
        &self,
        user_id: Uuid,
        pillar_id: Uuid,
        audience_id: Uuid,
        strength: i16,
    ) -> Result<PillarAudienceLink, AppError> {
        let query = format!(
            "INSERT INTO pillar_audience_links (id, user_id, pillar_id, audience_id, strength) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (pillar_id, audience_id) DO UPDATE SET strength = EXCLUDED.strength \
             RETURNING {LINK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, PillarAudienceLink>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(pillar_id)
            .bind(audience_id)
            .bind(strength)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_link(&self, pillar_id: Uuid, audience_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM pillar_audience_links WHERE pillar_id = $1 AND audience_id = $2",
        )
        .bind(pillar_id)
        .bind(audience_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
