use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{ContentType, UnknownVariant};
use crate::status::IdeaStatus;

/// Where an idea came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaSource {
    Manual,
    Meeting,
    Other,
}

impl IdeaSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaSource::Manual => "manual",
            IdeaSource::Meeting => "meeting",
            IdeaSource::Other => "other",
        }
    }
}

impl std::str::FromStr for IdeaSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(IdeaSource::Manual),
            "meeting" => Ok(IdeaSource::Meeting),
            "other" => Ok(IdeaSource::Other),
            other => Err(UnknownVariant {
                kind: "idea source",
                value: other.to_string(),
            }),
        }
    }
}

/// What a piece of content is meant to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentGoal {
    Awareness,
    Engagement,
    LeadGeneration,
    ThoughtLeadership,
    Education,
}

impl ContentGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentGoal::Awareness => "awareness",
            ContentGoal::Engagement => "engagement",
            ContentGoal::LeadGeneration => "lead_generation",
            ContentGoal::ThoughtLeadership => "thought_leadership",
            ContentGoal::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentGoal::Awareness => "Awareness",
            ContentGoal::Engagement => "Engagement",
            ContentGoal::LeadGeneration => "Lead Generation",
            ContentGoal::ThoughtLeadership => "Thought Leadership",
            ContentGoal::Education => "Education",
        }
    }

    /// Accepts both the stored form (`thought_leadership`) and the display
    /// form (`Thought Leadership`) used by legacy notes.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        normalized.parse().ok()
    }
}

impl std::str::FromStr for ContentGoal {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awareness" => Ok(ContentGoal::Awareness),
            "engagement" => Ok(ContentGoal::Engagement),
            "lead_generation" => Ok(ContentGoal::LeadGeneration),
            "thought_leadership" => Ok(ContentGoal::ThoughtLeadership),
            "education" => Ok(ContentGoal::Education),
            other => Err(UnknownVariant {
                kind: "content goal",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentIdea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub content_goal: Option<ContentGoal>,
    pub call_to_action: Option<String>,
    pub source: IdeaSource,
    pub source_url: Option<String>,
    pub source_excerpt: Option<String>,
    pub document_id: Option<Uuid>,
    pub status: IdeaStatus,
    pub content_type: Option<ContentType>,
    pub has_been_used: bool,
    pub pillar_ids: Vec<Uuid>,
    pub audience_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a new idea. The store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub content_goal: Option<ContentGoal>,
    pub call_to_action: Option<String>,
    pub source: IdeaSource,
    pub source_url: Option<String>,
    pub source_excerpt: Option<String>,
    pub document_id: Option<Uuid>,
    pub status: IdeaStatus,
    pub content_type: Option<ContentType>,
    pub pillar_ids: Vec<Uuid>,
    pub audience_ids: Vec<Uuid>,
}

/// Field edits. `None` leaves a field untouched; status is not editable here.
///
/// The free-text fields are `Option<Option<_>>`: an absent key keeps the stored
/// value, an explicit JSON `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub content_goal: Option<ContentGoal>,
    #[serde(default, deserialize_with = "present")]
    pub call_to_action: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub source_url: Option<Option<String>>,
    pub content_type: Option<ContentType>,
    pub has_been_used: Option<bool>,
    pub pillar_ids: Option<Vec<Uuid>>,
    pub audience_ids: Option<Vec<Uuid>>,
}

/// Marks a key that was present in the body, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ────────────────────────────────────────────────────────────────────────────
// Legacy notes markers
// ────────────────────────────────────────────────────────────────────────────

const GOAL_MARKER: &str = "content goal:";
const CTA_MARKER: &str = "call to action:";

/// Structured values recovered from notes written before goal and CTA had columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyNotes {
    pub notes: Option<String>,
    pub content_goal: Option<ContentGoal>,
    pub call_to_action: Option<String>,
}

/// Splits `Content Goal: …` and `Call to Action: …` lines out of free-text notes.
/// Labels match case-insensitively. A goal label that is not a known goal stays
/// in the notes text.
pub fn parse_legacy_notes(notes: &str) -> LegacyNotes {
    let mut parsed = LegacyNotes::default();
    let mut remaining = Vec::new();

    for line in notes.lines() {
        let trimmed = line.trim();
        if parsed.content_goal.is_none() {
            if let Some(goal) = strip_label(trimmed, GOAL_MARKER).and_then(ContentGoal::parse_loose)
            {
                parsed.content_goal = Some(goal);
                continue;
            }
        }
        if parsed.call_to_action.is_none() {
            if let Some(value) = strip_label(trimmed, CTA_MARKER) {
                let value = value.trim();
                if !value.is_empty() {
                    parsed.call_to_action = Some(value.to_string());
                }
                continue;
            }
        }
        remaining.push(line);
    }

    let text = remaining.join("\n").trim().to_string();
    parsed.notes = (!text.is_empty()).then_some(text);
    parsed
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| &line[label.len()..])
}

impl ContentIdea {
    /// Fills `content_goal` / `call_to_action` from legacy note markers when
    /// neither structured field is set. Read path only.
    pub fn migrate_legacy_notes(mut self) -> Self {
        if self.content_goal.is_some() || self.call_to_action.is_some() {
            return self;
        }
        if let Some(notes) = self.notes.as_deref() {
            let parsed = parse_legacy_notes(notes);
            if parsed.content_goal.is_some() || parsed.call_to_action.is_some() {
                self.notes = parsed.notes;
                self.content_goal = parsed.content_goal;
                self.call_to_action = parsed.call_to_action;
            }
        }
        self
    }
}
