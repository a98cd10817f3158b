//! Writing-style profile and its legacy storage shape.
//!
//! Internally a profile has one canonical shape. Stored profiles carry every
//! field twice (snake_case and camelCase). [`LegacyStyleProfile`] maps between
//! the two at the persistence edge only. On read camelCase wins whenever it is
//! present; on write both spellings are populated.

use serde::{Deserialize, Serialize};

use crate::models::ContentType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WritingStyleProfile {
    pub voice_analysis: Option<String>,
    pub general_style_guide: Option<String>,
    pub linkedin_style_guide: Option<String>,
    pub newsletter_style_guide: Option<String>,
    pub marketing_style_guide: Option<String>,
    pub vocabulary_patterns: Option<String>,
    pub avoid_patterns: Option<String>,
    #[serde(default)]
    pub example_quotes: Vec<String>,
    #[serde(default)]
    pub linkedin_examples: Vec<String>,
    pub custom_prompt_instructions: Option<String>,
}

impl WritingStyleProfile {
    pub fn style_guide_for(&self, content_type: ContentType) -> Option<&str> {
        match content_type {
            ContentType::Linkedin => self.linkedin_style_guide.as_deref(),
            ContentType::Newsletter => self.newsletter_style_guide.as_deref(),
            ContentType::Marketing => self.marketing_style_guide.as_deref(),
        }
    }
}

/// The dual-spelled JSON document found in storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyStyleProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_analysis: Option<String>,
    #[serde(default, rename = "voiceAnalysis", skip_serializing_if = "Option::is_none")]
    pub voice_analysis_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_style_guide: Option<String>,
    #[serde(default, rename = "generalStyleGuide", skip_serializing_if = "Option::is_none")]
    pub general_style_guide_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_style_guide: Option<String>,
    #[serde(default, rename = "linkedinStyleGuide", skip_serializing_if = "Option::is_none")]
    pub linkedin_style_guide_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter_style_guide: Option<String>,
    #[serde(default, rename = "newsletterStyleGuide", skip_serializing_if = "Option::is_none")]
    pub newsletter_style_guide_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_style_guide: Option<String>,
    #[serde(default, rename = "marketingStyleGuide", skip_serializing_if = "Option::is_none")]
    pub marketing_style_guide_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_patterns: Option<String>,
    #[serde(default, rename = "vocabularyPatterns", skip_serializing_if = "Option::is_none")]
    pub vocabulary_patterns_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_patterns: Option<String>,
    #[serde(default, rename = "avoidPatterns", skip_serializing_if = "Option::is_none")]
    pub avoid_patterns_camel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_quotes: Option<Vec<String>>,
    #[serde(default, rename = "exampleQuotes", skip_serializing_if = "Option::is_none")]
    pub example_quotes_camel: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_examples: Option<Vec<String>>,
    #[serde(default, rename = "linkedinExamples", skip_serializing_if = "Option::is_none")]
    pub linkedin_examples_camel: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt_instructions: Option<String>,
    #[serde(
        default,
        rename = "customPromptInstructions",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_prompt_instructions_camel: Option<String>,
}

fn prefer_camel<T>(camel: Option<T>, snake: Option<T>) -> Option<T> {
    camel.or(snake)
}

impl From<LegacyStyleProfile> for WritingStyleProfile {
    fn from(legacy: LegacyStyleProfile) -> Self {
        WritingStyleProfile {
            voice_analysis: prefer_camel(legacy.voice_analysis_camel, legacy.voice_analysis),
            general_style_guide: prefer_camel(
                legacy.general_style_guide_camel,
                legacy.general_style_guide,
            ),
            linkedin_style_guide: prefer_camel(
                legacy.linkedin_style_guide_camel,
                legacy.linkedin_style_guide,
            ),
            newsletter_style_guide: prefer_camel(
                legacy.newsletter_style_guide_camel,
                legacy.newsletter_style_guide,
            ),
            marketing_style_guide: prefer_camel(
                legacy.marketing_style_guide_camel,
                legacy.marketing_style_guide,
            ),
            vocabulary_patterns: prefer_camel(
                legacy.vocabulary_patterns_camel,
                legacy.vocabulary_patterns,
            ),
            avoid_patterns: prefer_camel(legacy.avoid_patterns_camel, legacy.avoid_patterns),
            example_quotes: prefer_camel(legacy.example_quotes_camel, legacy.example_quotes)
                .unwrap_or_default(),
            linkedin_examples: prefer_camel(
                legacy.linkedin_examples_camel,
                legacy.linkedin_examples,
            )
            .unwrap_or_default(),
            custom_prompt_instructions: prefer_camel(
                legacy.custom_prompt_instructions_camel,
                legacy.custom_prompt_instructions,
            ),
        }
    }
}

impl From<&WritingStyleProfile> for LegacyStyleProfile {
    fn from(p: &WritingStyleProfile) -> Self {
        LegacyStyleProfile {
            voice_analysis: p.voice_analysis.clone(),
            voice_analysis_camel: p.voice_analysis.clone(),
            general_style_guide: p.general_style_guide.clone(),
            general_style_guide_camel: p.general_style_guide.clone(),
            linkedin_style_guide: p.linkedin_style_guide.clone(),
            linkedin_style_guide_camel: p.linkedin_style_guide.clone(),
            newsletter_style_guide: p.newsletter_style_guide.clone(),
            newsletter_style_guide_camel: p.newsletter_style_guide.clone(),
            marketing_style_guide: p.marketing_style_guide.clone(),
            marketing_style_guide_camel: p.marketing_style_guide.clone(),
            vocabulary_patterns: p.vocabulary_patterns.clone(),
            vocabulary_patterns_camel: p.vocabulary_patterns.clone(),
            avoid_patterns: p.avoid_patterns.clone(),
            avoid_patterns_camel: p.avoid_patterns.clone(),
            example_quotes: Some(p.example_quotes.clone()),
            example_quotes_camel: Some(p.example_quotes.clone()),
            linkedin_examples: Some(p.linkedin_examples.clone()),
            linkedin_examples_camel: Some(p.linkedin_examples.clone()),
            custom_prompt_instructions: p.custom_prompt_instructions.clone(),
            custom_prompt_instructions_camel: p.custom_prompt_instructions.clone(),
        }
    }
}

/// Decodes a stored profile document into the canonical shape.
pub fn profile_from_storage(value: serde_json::Value) -> Result<WritingStyleProfile, serde_json::Error> {
    let legacy: LegacyStyleProfile = serde_json::from_value(value)?;
    Ok(legacy.into())
}

/// Encodes a canonical profile into the dual-spelled storage document.
pub fn profile_to_storage(profile: &WritingStyleProfile) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(LegacyStyleProfile::from(profile))
}
