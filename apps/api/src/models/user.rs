use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Business identity of a user, used as the base context of every prompt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub business_name: Option<String>,
    pub business_description: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileInput {
    pub email: String,
    pub full_name: Option<String>,
    pub business_name: Option<String>,
    pub business_description: Option<String>,
}

/// Organizational scope derived from an email domain.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub domain: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
