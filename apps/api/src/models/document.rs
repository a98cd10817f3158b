use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UnknownVariant;

/// Generates `as_str` / `FromStr` for a snake_case string enum stored as TEXT.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Transcript,
    Blog,
    Whitepaper,
    CaseStudy,
    Newsletter,
    Other,
}

text_enum!(DocumentType, "document type", {
    Transcript => "transcript",
    Blog => "blog",
    Whitepaper => "whitepaper",
    CaseStudy => "case_study",
    Newsletter => "newsletter",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentPurpose {
    WritingSample,
    BusinessContext,
    ContentIdea,
    Research,
}

text_enum!(DocumentPurpose, "document purpose", {
    WritingSample => "writing_sample",
    BusinessContext => "business_context",
    ContentIdea => "content_idea",
    Research => "research",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Active,
    Archived,
}

text_enum!(DocumentStatus, "document status", {
    Active => "active",
    Archived => "archived",
});

/// Progress of background idea extraction. Terminal states are
/// `completed` and `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Idle,
    Processing,
    Completed,
    Failed,
}

text_enum!(ProcessingStatus, "processing status", {
    Idle => "idle",
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub document_type: DocumentType,
    pub purpose: DocumentPurpose,
    pub status: DocumentStatus,
    pub processing_status: ProcessingStatus,
    pub has_ideas: bool,
    pub ideas_count: i32,
    pub file_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub document_type: DocumentType,
    pub purpose: DocumentPurpose,
    pub file_key: Option<String>,
}

impl NewDocument {
    /// A transcript delivered by a meeting-recorder webhook.
    pub fn transcript(user_id: Uuid, tenant_id: Option<Uuid>, title: &str, content: &str) -> Self {
        Self {
            user_id,
            tenant_id,
            title: title.to_string(),
            content: content.to_string(),
            document_type: DocumentType::Transcript,
            purpose: DocumentPurpose::ContentIdea,
            file_key: None,
        }
    }
}
