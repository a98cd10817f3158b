//! Generation client: sends a built prompt plus metadata to the text-completion
//! service and normalizes the result.
//!
//! The pipeline depends on the `Generator` trait, not on `LlmClient`, so use-cases
//! can be exercised with a scripted generator. `AppState` carries an
//! `Arc<dyn Generator>`.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::generation::classify::GenerationError;
use crate::generation::prompt_builder::{build_preview_prompt, BusinessContext};
use crate::llm_client::prompts::WRITER_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::style::WritingStyleProfile;
use crate::models::ContentType;

/// Idea metadata forwarded alongside the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaRef {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
}

/// Distinguishes draft generation from style previews in logs and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTask {
    GenerateContent,
    PreviewStyle,
}

impl GenerationTask {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateContent => "generate_content",
            Self::PreviewStyle => "preview_style",
        }
    }
}

impl fmt::Display for GenerationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound generation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub content_type: ContentType,
    pub idea: Option<IdeaRef>,
    pub task: GenerationTask,
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
}

/// What a generation call hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Content(String),
    /// Debug mode: the exact prompt that would have been sent. No model call was made.
    DebugPrompt(String),
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Returns the raw completion text. Errors are already classified.
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Production generator backed by the shared `LlmClient`.
///
/// The provider's request metadata only carries an end-user id, so the user id
/// is sent there. Task, tenant and idea travel on the `generation` span that
/// `generate_content` opens around the call.
pub struct LlmGenerator(pub LlmClient);

#[async_trait]
impl Generator for LlmGenerator {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let user_id = request.user_id.to_string();
        self.0
            .call_text(&request.prompt, WRITER_SYSTEM, Some(&user_id))
            .await
            .map_err(GenerationError::from)
    }
}

/// Span wrapping one model call, tagged with the request metadata.
pub fn generation_span(request: &GenerationRequest) -> Span {
    let idea = request.idea.as_ref();
    info_span!(
        "generation",
        task = %request.task,
        user_id = %request.user_id,
        tenant_id = ?request.tenant_id,
        idea_id = ?idea.and_then(|i| i.id),
        idea_title = idea.map(|i| i.title.as_str()),
        content_type = %request.content_type,
    )
}

/// Sends `request` unless `debug` is set, in which case the prompt is returned verbatim.
///
/// Success always carries non-empty text; an empty completion is
/// `GenerationError::EmptyCompletion`.
pub async fn generate_content(
    generator: &dyn Generator,
    request: GenerationRequest,
    debug: bool,
) -> Result<GenerationOutcome, GenerationError> {
    if debug {
        info!(
            task = %request.task,
            user_id = %request.user_id,
            content_type = %request.content_type,
            "Debug mode: returning prompt without generation"
        );
        return Ok(GenerationOutcome::DebugPrompt(request.prompt));
    }

    let idea_id = request.idea.as_ref().and_then(|i| i.id);
    let span = generation_span(&request);
    match generator.complete(&request).instrument(span).await {
        Ok(text) if text.trim().is_empty() => {
            warn!(?idea_id, user_id = %request.user_id, "Generation returned empty completion");
            Err(GenerationError::EmptyCompletion)
        }
        Ok(text) => {
            info!(
                ?idea_id,
                task = %request.task,
                user_id = %request.user_id,
                tenant_id = ?request.tenant_id,
                content_type = %request.content_type,
                chars = text.len(),
                "Generated content"
            );
            Ok(GenerationOutcome::Content(text))
        }
        Err(e) => {
            warn!(
                ?idea_id,
                task = %request.task,
                user_id = %request.user_id,
                tenant_id = ?request.tenant_id,
                kind = %e.kind(),
                retryable = e.retryable(),
                "Generation failed: {e}"
            );
            Err(e)
        }
    }
}

/// Preview variant: builds its own prompt from a style profile and business
/// description instead of an idea.
pub async fn generate_preview(
    generator: &dyn Generator,
    business: &BusinessContext<'_>,
    style: Option<&WritingStyleProfile>,
    content_type: ContentType,
    user_id: Uuid,
    tenant_id: Option<Uuid>,
    debug: bool,
) -> Result<GenerationOutcome, GenerationError> {
    let request = GenerationRequest {
        prompt: build_preview_prompt(business, style, content_type),
        content_type,
        idea: None,
        task: GenerationTask::PreviewStyle,
        user_id,
        tenant_id,
    };
    generate_content(generator, request, debug).await
}
