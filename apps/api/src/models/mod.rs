pub mod document;
pub mod draft;
pub mod idea;
pub mod story;
pub mod strategy;
pub mod style;
pub mod user;
pub mod webhook;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a persisted string column holds a value outside its closed set.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// The three formats a draft can be written for. Drives style-guide selection,
/// best-practice checklists, and the task wording of the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Linkedin,
    Newsletter,
    Marketing,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Linkedin => "linkedin",
            ContentType::Newsletter => "newsletter",
            ContentType::Marketing => "marketing",
        }
    }

    /// Human-readable label used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Linkedin => "LinkedIn",
            ContentType::Newsletter => "Newsletter",
            ContentType::Marketing => "Marketing",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(ContentType::Linkedin),
            "newsletter" => Ok(ContentType::Newsletter),
            "marketing" => Ok(ContentType::Marketing),
            other => Err(UnknownVariant {
                kind: "content type",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trips_through_str() {
        for ct in [
            ContentType::Linkedin,
            ContentType::Newsletter,
            ContentType::Marketing,
        ] {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
    }

    #[test]
    fn test_unknown_content_type_is_rejected() {
        let err = "tweet".parse::<ContentType>().unwrap_err();
        assert_eq!(err.value, "tweet");
    }
}
