use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::generation::client::Generator;
use crate::ingest::extraction::IdeaExtractor;
use crate::store::SharedStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// All persistence. `PgStore` in production.
    pub store: SharedStore,
    pub s3: S3Client,
    /// Draft and preview generation. `LlmGenerator` in production.
    pub generator: Arc<dyn Generator>,
    /// Background idea extraction from documents.
    pub extractor: Arc<dyn IdeaExtractor>,
    pub config: Config,
}
