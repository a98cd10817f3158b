//! Status lifecycles for content ideas and drafts.
//!
//! Both entities move through a closed set of states. Every write path that
//! changes a status consults [`validate_transition`], which reads the legal
//! edges from each lifecycle's table. Nothing else decides legality.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UnknownVariant;

/// A closed status type with a static table of legal next states.
pub trait Lifecycle: Copy + Eq + std::fmt::Debug + 'static {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// States reachable from `self` in one step.
    fn allowed_next(self) -> &'static [Self];

    fn as_str(self) -> &'static str;
}

/// An attempted status change that the lifecycle table does not allow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot transition {entity} from '{from}' to '{to}'")]
pub struct StatusTransitionError {
    pub entity: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub fn is_valid_transition<S: Lifecycle>(current: S, next: S) -> bool {
    current.allowed_next().contains(&next)
}

pub fn validate_transition<S: Lifecycle>(current: S, next: S) -> Result<(), StatusTransitionError> {
    if is_valid_transition(current, next) {
        Ok(())
    } else {
        Err(StatusTransitionError {
            entity: S::ENTITY,
            from: current.as_str(),
            to: next.as_str(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Idea lifecycle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Unreviewed,
    Approved,
    Drafted,
    Rejected,
    Archived,
}

impl Lifecycle for IdeaStatus {
    const ENTITY: &'static str = "content idea";

    /// - `unreviewed` -> `approved`, `rejected`, `archived`
    /// - `approved`   -> `drafted`, `rejected`, `archived`
    /// - `drafted`    -> `archived`
    /// - `rejected`   -> `archived`
    /// - `archived`   -> `unreviewed` (restore)
    fn allowed_next(self) -> &'static [Self] {
        use IdeaStatus::*;
        match self {
            Unreviewed => &[Approved, Rejected, Archived],
            Approved => &[Drafted, Rejected, Archived],
            Drafted => &[Archived],
            Rejected => &[Archived],
            Archived => &[Unreviewed],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            IdeaStatus::Unreviewed => "unreviewed",
            IdeaStatus::Approved => "approved",
            IdeaStatus::Drafted => "drafted",
            IdeaStatus::Rejected => "rejected",
            IdeaStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for IdeaStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unreviewed" => Ok(IdeaStatus::Unreviewed),
            "approved" => Ok(IdeaStatus::Approved),
            "drafted" => Ok(IdeaStatus::Drafted),
            "rejected" => Ok(IdeaStatus::Rejected),
            "archived" => Ok(IdeaStatus::Archived),
            other => Err(UnknownVariant {
                kind: "idea status",
                value: other.to_string(),
            }),
        }
    }
}

pub fn is_valid_idea_status_transition(current: IdeaStatus, next: IdeaStatus) -> bool {
    is_valid_transition(current, next)
}

// ────────────────────────────────────────────────────────────────────────────
// Draft lifecycle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Draft,
    Ready,
    Published,
    Archived,
}

impl Lifecycle for DraftStatus {
    const ENTITY: &'static str = "content draft";

    fn allowed_next(self) -> &'static [Self] {
        use DraftStatus::*;
        match self {
            Draft => &[Ready, Archived],
            Ready => &[Published, Draft, Archived],
            Published => &[Draft, Ready, Archived],
            Archived => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DraftStatus::Draft => "draft",
            DraftStatus::Ready => "ready",
            DraftStatus::Published => "published",
            DraftStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for DraftStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DraftStatus::Draft),
            "ready" => Ok(DraftStatus::Ready),
            "published" => Ok(DraftStatus::Published),
            "archived" => Ok(DraftStatus::Archived),
            other => Err(UnknownVariant {
                kind: "draft status",
                value: other.to_string(),
            }),
        }
    }
}

pub fn is_valid_draft_status_transition(current: DraftStatus, next: DraftStatus) -> bool {
    is_valid_transition(current, next)
}

// ────────────────────────────────────────────────────────────────────────────
// Batch reporting
// ────────────────────────────────────────────────────────────────────────────

/// Why one member of a batch was not updated.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub id: uuid::Uuid,
    pub reason: String,
}

/// Outcome of applying one transition to many entities independently.
/// Batches are not atomic: `succeeded` is the number of rows actually written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub requested: usize,
    pub succeeded: usize,
    pub skipped: Vec<SkippedItem>,
}
