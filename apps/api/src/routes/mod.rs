pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::pipeline::handlers as pipeline;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::strategy::handlers as strategy;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Ideas
        .route(
            "/api/v1/ideas",
            get(pipeline::handle_list_ideas).post(pipeline::handle_create_idea),
        )
        .route(
            "/api/v1/ideas/generate",
            post(pipeline::handle_save_and_generate),
        )
        .route("/api/v1/ideas/prompt", post(pipeline::handle_debug_prompt))
        .route(
            "/api/v1/ideas/batch/status",
            post(pipeline::handle_batch_idea_status),
        )
        .route(
            "/api/v1/ideas/:id",
            get(pipeline::handle_get_idea)
                .patch(pipeline::handle_update_idea)
                .delete(pipeline::handle_delete_idea),
        )
        .route(
            "/api/v1/ideas/:id/status",
            patch(pipeline::handle_update_idea_status),
        )
        .route(
            "/api/v1/ideas/:id/drafts",
            get(pipeline::handle_list_idea_drafts).post(pipeline::handle_generate_draft),
        )
        // Drafts
        .route("/api/v1/drafts", get(pipeline::handle_list_drafts))
        .route(
            "/api/v1/drafts/batch/status",
            post(pipeline::handle_batch_draft_status),
        )
        .route(
            "/api/v1/drafts/:id",
            get(pipeline::handle_get_draft)
                .patch(pipeline::handle_update_draft)
                .delete(pipeline::handle_delete_draft),
        )
        .route(
            "/api/v1/drafts/:id/status",
            patch(pipeline::handle_update_draft_status),
        )
        .route(
            "/api/v1/drafts/:id/regenerate",
            post(pipeline::handle_regenerate),
        )
        .route("/api/v1/preview", post(pipeline::handle_preview))
        // Documents and ingestion
        .route(
            "/api/v1/documents",
            get(ingest::handle_list_documents).post(ingest::handle_create_document),
        )
        .route(
            "/api/v1/documents/upload",
            post(ingest::handle_upload_document).layer(upload_limit),
        )
        .route(
            "/api/v1/documents/:id",
            get(ingest::handle_get_document).delete(ingest::handle_delete_document),
        )
        .route(
            "/api/v1/documents/:id/status",
            patch(ingest::handle_set_document_status),
        )
        .route(
            "/api/v1/documents/:id/extract",
            post(ingest::handle_extract_document),
        )
        .route(
            "/api/v1/webhooks",
            get(ingest::handle_list_webhooks).post(ingest::handle_upsert_webhook),
        )
        .route(
            "/api/v1/webhooks/:id",
            patch(ingest::handle_set_webhook_active),
        )
        .route(
            "/webhook/transcript",
            post(ingest::handle_transcript_webhook),
        )
        // Strategy
        .route(
            "/api/v1/pillars",
            get(strategy::handle_list_pillars).post(strategy::handle_create_pillar),
        )
        .route(
            "/api/v1/pillars/:id",
            patch(strategy::handle_update_pillar).delete(strategy::handle_delete_pillar),
        )
        .route(
            "/api/v1/audiences",
            get(strategy::handle_list_audiences).post(strategy::handle_create_audience),
        )
        .route(
            "/api/v1/audiences/:id",
            patch(strategy::handle_update_audience).delete(strategy::handle_delete_audience),
        )
        .route(
            "/api/v1/pillar-audience-links",
            get(strategy::handle_list_links).put(strategy::handle_set_link),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_save_profile),
        )
        .route(
            "/api/v1/style-profile",
            get(profile::handle_get_style_profile).put(profile::handle_save_style_profile),
        )
        .route(
            "/api/v1/stories",
            get(profile::handle_list_stories).post(profile::handle_create_story),
        )
        .route(
            "/api/v1/stories/:id",
            patch(profile::handle_update_story).delete(profile::handle_delete_story),
        )
        .with_state(state)
}
