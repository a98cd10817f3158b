use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UnknownVariant;

/// Meeting recorders that can push transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookService {
    Otter,
    Fathom,
    Read,
    Fireflies,
}

impl WebhookService {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookService::Otter => "otter",
            WebhookService::Fathom => "fathom",
            WebhookService::Read => "read",
            WebhookService::Fireflies => "fireflies",
        }
    }
}

impl std::str::FromStr for WebhookService {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "otter" => Ok(WebhookService::Otter),
            "fathom" => Ok(WebhookService::Fathom),
            "read" => Ok(WebhookService::Read),
            "fireflies" => Ok(WebhookService::Fireflies),
            other => Err(UnknownVariant {
                kind: "webhook service",
                value: other.to_string(),
            }),
        }
    }
}

/// At most one configuration exists per (user, service).
/// `user_id` is nullable in storage; a configuration without one cannot own transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfiguration {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub service: WebhookService,
    pub webhook_token: String,
    pub is_active: bool,
    pub last_connected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Generates an opaque webhook token.
pub fn generate_webhook_token() -> String {
    Uuid::new_v4().simple().to_string()
}
