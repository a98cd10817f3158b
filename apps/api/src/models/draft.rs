use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::idea::ContentGoal;
use crate::models::ContentType;
use crate::status::DraftStatus;

/// Generated content tied to exactly one idea.
///
/// `version` increases along the (idea, content type) lineage. The caller
/// computes it; the store does not enforce monotonicity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDraft {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub content_type: ContentType,
    pub content_goal: Option<ContentGoal>,
    pub version: i32,
    pub content: String,
    pub feedback: Option<String>,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDraft {
    pub idea_id: Uuid,
    pub content_type: ContentType,
    pub content_goal: Option<ContentGoal>,
    pub version: i32,
    pub content: String,
    pub feedback: Option<String>,
    pub status: DraftStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub content: Option<String>,
    pub feedback: Option<String>,
}
