//! Background idea extraction.
//!
//! A document moves `idle → processing → completed | failed`. Entering
//! `processing` is an atomic claim in the store, so at most one extraction runs
//! per document. The triggering request returns once the claim is made;
//! extraction runs on its own task and `processing_status` is the only progress
//! signal.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::generation::classify::GenerationError;
use crate::ingest::prompts::{EXTRACTION_PROMPT, EXTRACTION_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::document::{Document, DocumentType, ProcessingStatus};
use crate::models::idea::{IdeaSource, NewIdea};
use crate::status::IdeaStatus;
use crate::store::{ContentStore, DocumentStore, IdeaStore, SharedStore};

/// Ideas kept from one document.
pub const MAX_IDEAS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedIdea {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

#[async_trait]
pub trait IdeaExtractor: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractedIdea>, GenerationError>;
}

/// Production extractor backed by the shared `LlmClient`.
pub struct LlmIdeaExtractor(pub LlmClient);

#[async_trait]
impl IdeaExtractor for LlmIdeaExtractor {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractedIdea>, GenerationError> {
        let prompt = EXTRACTION_PROMPT
            .replace("{document_type}", document_type_label(document.document_type))
            .replace("{title}", &document.title)
            .replace("{content}", &document.content)
            .replace("{max_ideas}", &MAX_IDEAS.to_string());

        self.0
            .call_json(&prompt, EXTRACTION_SYSTEM)
            .await
            .map_err(GenerationError::from)
    }
}

fn document_type_label(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::Transcript => "meeting transcript",
        DocumentType::Blog => "blog post",
        DocumentType::Whitepaper => "whitepaper",
        DocumentType::CaseStudy => "case study",
        DocumentType::Newsletter => "newsletter",
        DocumentType::Other => "document",
    }
}

fn source_for(document_type: DocumentType) -> IdeaSource {
    match document_type {
        DocumentType::Transcript => IdeaSource::Meeting,
        _ => IdeaSource::Other,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn extract_and_store(
    store: &dyn ContentStore,
    extractor: &dyn IdeaExtractor,
    document: &Document,
) -> Result<i32, AppError> {
    let extracted = extractor.extract(document).await?;

    let mut created = 0;
    for idea in extracted.into_iter().take(MAX_IDEAS) {
        let title = idea.title.trim();
        if title.is_empty() {
            continue;
        }
        store
            .create_idea(NewIdea {
                user_id: document.user_id,
                tenant_id: document.tenant_id,
                title: title.to_string(),
                description: non_blank(idea.description),
                notes: None,
                content_goal: None,
                call_to_action: None,
                source: source_for(document.document_type),
                source_url: None,
                source_excerpt: non_blank(idea.excerpt),
                document_id: Some(document.id),
                status: IdeaStatus::Unreviewed,
                content_type: None,
                pillar_ids: Vec::new(),
                audience_ids: Vec::new(),
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

/// Runs extraction on a document the caller has already claimed and returns
/// the terminal status. Never leaves the document in `processing` unless the
/// failure write itself fails.
pub async fn run_extraction(
    store: &dyn ContentStore,
    extractor: &dyn IdeaExtractor,
    document: &Document,
) -> ProcessingStatus {
    let document_id = document.id;

    let result = match extract_and_store(store, extractor, document).await {
        Ok(count) => store
            .complete_extraction(document_id, count)
            .await
            .map(|_| count),
        Err(e) => Err(e),
    };

    match result {
        Ok(count) => {
            info!(%document_id, ideas = count, "Idea extraction completed");
            ProcessingStatus::Completed
        }
        Err(e) => {
            warn!(%document_id, "Idea extraction failed: {e}");
            if let Err(write_err) = store
                .set_processing_status(document_id, ProcessingStatus::Failed)
                .await
            {
                error!(%document_id, "Could not mark document as failed: {write_err}");
            }
            ProcessingStatus::Failed
        }
    }
}

/// Fire-and-forget extraction of an already claimed document.
pub fn spawn_extraction(
    store: SharedStore,
    extractor: Arc<dyn IdeaExtractor>,
    document: Document,
) -> JoinHandle<ProcessingStatus> {
    tokio::spawn(async move { run_extraction(store.as_ref(), extractor.as_ref(), &document).await })
}

/// Claims the document for extraction and spawns the run. Returns `None`
/// without spawning when an extraction already holds the document.
pub async fn start_extraction(
    store: SharedStore,
    extractor: Arc<dyn IdeaExtractor>,
    mut document: Document,
) -> Result<Option<JoinHandle<ProcessingStatus>>, AppError> {
    if !store.claim_processing(document.id).await? {
        return Ok(None);
    }
    document.processing_status = ProcessingStatus::Processing;
    Ok(Some(spawn_extraction(store, extractor, document)))
}
