//! Prompt builder: pure functions that assemble the draft-generation prompt.
//!
//! Sections are appended in a fixed order:
//! base context → best practices → examples → content idea → custom
//! instructions → task.
//!
//! Each `append_*` function takes the accumulated prompt by value and returns
//! the extended prompt. No section is ever dropped for missing data: empty
//! fields render an explicit placeholder. Output is byte-identical for
//! identical input (the debug-prompt view relies on this).

use crate::generation::prompts::{
    LINKEDIN_BEST_PRACTICES, LINKEDIN_TASK, MARKETING_BEST_PRACTICES, MARKETING_TASK,
    NEWSLETTER_BEST_PRACTICES, NEWSLETTER_TASK, NOT_SPECIFIED, NO_AUDIENCES, NO_PILLARS,
    NO_PREVIOUS_POSTS, NO_STYLE_PROFILE, POST_BEGIN, POST_END, PREVIEW_TASK,
};
use crate::models::idea::ContentGoal;
use crate::models::strategy::{ContentPillar, TargetAudience};
use crate::models::style::WritingStyleProfile;
use crate::models::ContentType;

/// Who is writing, and for which business.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessContext<'a> {
    pub author_name: Option<&'a str>,
    pub business_name: Option<&'a str>,
    pub business_description: Option<&'a str>,
}

/// The part of an idea that goes into a prompt.
#[derive(Debug, Clone, Copy)]
pub struct IdeaBrief<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub content_goal: Option<ContentGoal>,
    pub call_to_action: Option<&'a str>,
    pub source_excerpt: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub business: BusinessContext<'a>,
    pub pillars: &'a [ContentPillar],
    pub audiences: &'a [TargetAudience],
    pub style: Option<&'a WritingStyleProfile>,
    pub content_type: ContentType,
    /// `None` omits the examples block; `Some(&[])` renders the placeholder.
    pub examples: Option<&'a [String]>,
    pub idea: IdeaBrief<'a>,
    pub custom_instructions: Option<&'a str>,
}

/// Builds the full generation prompt for one content idea.
pub fn build_content_prompt(input: &PromptInput<'_>) -> String {
    let prompt = append_base_context(
        String::new(),
        &input.business,
        input.pillars,
        input.audiences,
        input.style,
        input.content_type,
    );
    let prompt = append_best_practices(prompt, input.content_type);
    let prompt = match input.examples {
        Some(examples) => append_examples(prompt, examples),
        None => prompt,
    };
    let prompt = append_idea(prompt, &input.idea);
    let prompt = append_custom_instructions(prompt, input.custom_instructions);
    append_task(prompt, input.content_type)
}

/// Builds the style-preview prompt: same base context, no idea.
pub fn build_preview_prompt(
    business: &BusinessContext<'_>,
    style: Option<&WritingStyleProfile>,
    content_type: ContentType,
) -> String {
    let prompt = append_base_context(String::new(), business, &[], &[], style, content_type);
    let prompt = append_best_practices(prompt, content_type);
    let prompt = match (content_type, style) {
        (ContentType::Linkedin, Some(profile)) => append_examples(prompt, &profile.linkedin_examples),
        (ContentType::Linkedin, None) => append_examples(prompt, &[]),
        _ => prompt,
    };
    let prompt = append_custom_instructions(
        prompt,
        style.and_then(|s| s.custom_prompt_instructions.as_deref()),
    );
    append_section(prompt, PREVIEW_TASK)
}

// ────────────────────────────────────────────────────────────────────────────
// Section builders
// ────────────────────────────────────────────────────────────────────────────

pub fn append_base_context(
    prompt: String,
    business: &BusinessContext<'_>,
    pillars: &[ContentPillar],
    audiences: &[TargetAudience],
    style: Option<&WritingStyleProfile>,
    content_type: ContentType,
) -> String {
    let mut identity = String::from("# Context\n");
    identity.push_str(&format!("Author: {}\n", or_placeholder(business.author_name)));
    identity.push_str(&format!(
        "Business: {}\n",
        or_placeholder(business.business_name)
    ));
    identity.push_str(&format!(
        "Business Description: {}",
        or_placeholder(business.business_description)
    ));
    let prompt = append_section(prompt, &identity);

    let prompt = append_section(prompt, &render_pillars(pillars));
    let prompt = append_section(prompt, &render_audiences(audiences));
    append_section(prompt, &render_style(style, content_type))
}

pub fn append_best_practices(prompt: String, content_type: ContentType) -> String {
    let checklist = match content_type {
        ContentType::Linkedin => LINKEDIN_BEST_PRACTICES,
        ContentType::Newsletter => NEWSLETTER_BEST_PRACTICES,
        ContentType::Marketing => MARKETING_BEST_PRACTICES,
    };
    append_section(prompt, checklist)
}

pub fn append_examples(prompt: String, examples: &[String]) -> String {
    let mut section = String::from("## Previous Posts\n");
    let usable: Vec<&str> = examples
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();
    if usable.is_empty() {
        section.push_str(NO_PREVIOUS_POSTS);
    } else {
        let blocks: Vec<String> = usable
            .iter()
            .map(|post| format!("{POST_BEGIN}\n{post}\n{POST_END}"))
            .collect();
        section.push_str(&blocks.join("\n"));
    }
    append_section(prompt, &section)
}

pub fn append_idea(prompt: String, idea: &IdeaBrief<'_>) -> String {
    let mut section = String::from("## Content Idea\n");
    section.push_str(&format!("Title: {}", idea.title.trim()));
    if let Some(description) = non_empty(idea.description) {
        section.push_str(&format!("\nDescription: {description}"));
    }
    if let Some(notes) = non_empty(idea.notes) {
        section.push_str(&format!("\nNotes: {notes}"));
    }
    if let Some(goal) = idea.content_goal {
        section.push_str(&format!("\nContent Goal: {}", goal.label()));
    }
    if let Some(cta) = non_empty(idea.call_to_action) {
        section.push_str(&format!("\nCall to Action: {cta}"));
    }
    if let Some(excerpt) = non_empty(idea.source_excerpt) {
        section.push_str(&format!(
            "\nSource Transcript Excerpt:\n\"\"\"\n{excerpt}\n\"\"\""
        ));
    }
    append_section(prompt, &section)
}

pub fn append_custom_instructions(prompt: String, instructions: Option<&str>) -> String {
    match non_empty(instructions) {
        Some(text) => append_section(prompt, &format!("## Custom Instructions\n{text}")),
        None => prompt,
    }
}

pub fn append_task(prompt: String, content_type: ContentType) -> String {
    let task = match content_type {
        ContentType::Linkedin => LINKEDIN_TASK,
        ContentType::Newsletter => NEWSLETTER_TASK,
        ContentType::Marketing => MARKETING_TASK,
    };
    append_section(prompt, task)
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering helpers
// ────────────────────────────────────────────────────────────────────────────

fn render_pillars(pillars: &[ContentPillar]) -> String {
    let mut section = String::from("## Content Pillars\n");
    if pillars.is_empty() {
        section.push_str(NO_PILLARS);
        return section;
    }
    let lines: Vec<String> = pillars
        .iter()
        .map(|p| {
            format!(
                "- {}: {}",
                p.name.trim(),
                or_placeholder(p.description.as_deref())
            )
        })
        .collect();
    section.push_str(&lines.join("\n"));
    section
}

fn render_audiences(audiences: &[TargetAudience]) -> String {
    let mut section = String::from("## Target Audiences\n");
    if audiences.is_empty() {
        section.push_str(NO_AUDIENCES);
        return section;
    }
    let lines: Vec<String> = audiences
        .iter()
        .map(|a| {
            format!(
                "- {}: {} | Pain points: {} | Goals: {}",
                a.name.trim(),
                or_placeholder(a.description.as_deref()),
                join_or_placeholder(&a.pain_points),
                join_or_placeholder(&a.goals)
            )
        })
        .collect();
    section.push_str(&lines.join("\n"));
    section
}

fn render_style(style: Option<&WritingStyleProfile>, content_type: ContentType) -> String {
    let mut section = String::from("## Writing Style\n");
    if style.is_none() {
        section.push_str(NO_STYLE_PROFILE);
        section.push('\n');
    }
    section.push_str(&format!(
        "Voice Analysis: {}\n",
        style_field(style, |s| s.voice_analysis.as_deref())
    ));
    section.push_str(&format!(
        "General Style Guide: {}\n",
        style_field(style, |s| s.general_style_guide.as_deref())
    ));
    section.push_str(&format!(
        "{} Style Guide: {}\n",
        content_type.label(),
        style_field(style, |s| s.style_guide_for(content_type))
    ));
    section.push_str(&format!(
        "Vocabulary Patterns to Use: {}\n",
        style_field(style, |s| s.vocabulary_patterns.as_deref())
    ));
    section.push_str(&format!(
        "Patterns to Avoid: {}",
        style_field(style, |s| s.avoid_patterns.as_deref())
    ));
    section
}

fn style_field<'a>(
    style: Option<&'a WritingStyleProfile>,
    field: impl Fn(&'a WritingStyleProfile) -> Option<&'a str>,
) -> &'a str {
    or_placeholder(style.and_then(field))
}

fn append_section(mut prompt: String, section: &str) -> String {
    if !prompt.is_empty() {
        prompt.push_str("\n\n");
    }
    prompt.push_str(section);
    prompt
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_placeholder(value: Option<&str>) -> &str {
    non_empty(value).unwrap_or(NOT_SPECIFIED)
}

fn join_or_placeholder(items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        items.join("; ")
    }
}
