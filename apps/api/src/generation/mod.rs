// Draft generation: prompt assembly, the generation client, and failure classification.
// All model calls go through llm_client; no direct Anthropic calls here.

pub mod classify;
pub mod client;
pub mod prompt_builder;
pub mod prompts;
