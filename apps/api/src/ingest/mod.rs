// Source material ingestion: transcripts from meeting-recorder webhooks,
// pasted and uploaded documents, and background idea extraction over them.

pub mod documents;
pub mod extraction;
pub mod handlers;
pub mod prompts;
pub mod webhook;
