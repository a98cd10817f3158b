use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::errors::AppError;
use crate::models::story::{PersonalStory, StoryInput, StoryUpdate};
use crate::models::style::{profile_from_storage, profile_to_storage, WritingStyleProfile};
use crate::models::user::{Tenant, UserProfile, UserProfileInput};
use crate::store::ProfileStore;

const USER_COLUMNS: &str =
    "id, email, full_name, business_name, business_description, tenant_id, created_at";
const TENANT_COLUMNS: &str = "id, domain, name, created_at";
const STORY_COLUMNS: &str = "id, user_id, title, content, tags, created_at";

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn upsert_user(
        &self,
        user_id: Uuid,
        input: UserProfileInput,
        tenant_id: Option<Uuid>,
    ) -> Result<UserProfile, AppError> {
        let query = format!(
            "INSERT INTO users (id, email, full_name, business_name, business_description, tenant_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
                email = EXCLUDED.email, \
                full_name = EXCLUDED.full_name, \
                business_name = EXCLUDED.business_name, \
                business_description = EXCLUDED.business_description, \
                tenant_id = EXCLUDED.tenant_id \
             RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.business_name)
            .bind(&input.business_description)
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_tenant_by_domain(&self, domain: &str) -> Result<Option<Tenant>, AppError> {
        let query = format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE domain = $1");
        Ok(sqlx::query_as::<_, Tenant>(&query)
            .bind(domain)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_tenant(&self, domain: &str, name: &str) -> Result<Tenant, AppError> {
        // Two sign-ups from the same domain can race; the unique index on
        // domain keeps one row and the loser reads it back.
        let query = format!(
            "INSERT INTO tenants (id, domain, name) VALUES ($1, $2, $3) \
             ON CONFLICT (domain) DO UPDATE SET domain = EXCLUDED.domain \
             RETURNING {TENANT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Tenant>(&query)
            .bind(Uuid::new_v4())
            .bind(domain)
            .bind(name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_style_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<WritingStyleProfile>, AppError> {
        let stored: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT profile FROM writing_style_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        stored
            .map(profile_from_storage)
            .transpose()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt style profile: {e}")))
    }

    async fn save_style_profile(
        &self,
        user_id: Uuid,
        profile: &WritingStyleProfile,
    ) -> Result<(), AppError> {
        let document = profile_to_storage(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode style profile: {e}")))?;

        sqlx::query(
            "INSERT INTO writing_style_profiles (user_id, profile, updated_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET profile = EXCLUDED.profile, updated_at = NOW()",
        )
        .bind(user_id)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_stories(&self, user_id: Uuid) -> Result<Vec<PersonalStory>, AppError> {
        let query = format!(
            "SELECT {STORY_COLUMNS} FROM personal_stories WHERE user_id = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, PersonalStory>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_story(
        &self,
        user_id: Uuid,
        input: StoryInput,
    ) -> Result<PersonalStory, AppError> {
        let query = format!(
            "INSERT INTO personal_stories (id, user_id, title, content, tags) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {STORY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, PersonalStory>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.tags)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_story(
        &self,
        id: Uuid,
        update: StoryUpdate,
    ) -> Result<PersonalStory, AppError> {
        let query = format!(
            "UPDATE personal_stories SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                tags = COALESCE($4, tags) \
             WHERE id = $1 RETURNING {STORY_COLUMNS}"
        );
        sqlx::query_as::<_, PersonalStory>(&query)
            .bind(id)
            .bind(&update.title)
            .bind(&update.content)
            .bind(&update.tags)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Personal story", id))
    }

    async fn delete_story(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM personal_stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
