use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A strategic topic category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPillar {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A named reader segment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TargetAudience {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub pain_points: Vec<String>,
    pub goals: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PillarInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudienceInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Relationship between a pillar and an audience. Unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PillarAudienceLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pillar_id: Uuid,
    pub audience_id: Uuid,
    pub strength: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrength {
    Strong,
    Medium,
    Weak,
}

impl LinkStrength {
    pub fn classify(strength: i16) -> Self {
        if strength >= 8 {
            LinkStrength::Strong
        } else if strength >= 4 {
            LinkStrength::Medium
        } else {
            LinkStrength::Weak
        }
    }
}

impl PillarAudienceLink {
    pub fn level(&self) -> LinkStrength {
        LinkStrength::classify(self.strength)
    }
}
