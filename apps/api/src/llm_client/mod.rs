/// LLM Client: the single point of entry for all model calls in Quill.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Draft generation reaches this client through `generation::client::Generator`;
/// idea extraction through `ingest::extraction::IdeaExtractor`.
///
/// Model: claude-sonnet-4-5 (fixed, not configurable)
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Quill.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
/// Total attempts per call, the first included.
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<RequestMetadata<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Opaque end-user id forwarded for provider-side abuse tracking.
#[derive(Debug, Serialize)]
struct RequestMetadata<'a> {
    user_id: &'a str,
}

impl<'a> MessagesRequest<'a> {
    fn new(prompt: &'a str, system: &'a str, user_id: Option<&'a str>) -> Self {
        Self {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
            metadata: user_id.map(|user_id| RequestMetadata { user_id }),
        }
    }
}

/// A successful Messages API response.
#[derive(Debug, Deserialize)]
pub struct Completion {
    content: Vec<Block>,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl Completion {
    /// Text of the first text block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Outcome of one HTTP round trip.
enum Attempt {
    Done(Completion),
    Retry(LlmError),
}

/// Wraps the Anthropic Messages API with retries and text/JSON helpers.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, api_key })
    }

    /// Sends one prompt. 429s, 5xx responses and transport errors are retried
    /// after 1s then 2s; any other non-success status fails immediately.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        user_id: Option<&str>,
    ) -> Result<Completion, LlmError> {
        let request = MessagesRequest::new(prompt, system, user_id);
        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "Retrying LLM call");
                tokio::time::sleep(delay).await;
            }

            match self.send(&request).await? {
                Attempt::Done(completion) => {
                    debug!(
                        input_tokens = completion.usage.input_tokens,
                        output_tokens = completion.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return Ok(completion);
                }
                Attempt::Retry(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(LlmError::Api { status: 429, .. }) | None => LlmError::RateLimited {
                retries: MAX_ATTEMPTS - 1,
            },
            Some(e) => e,
        })
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<Attempt, LlmError> {
        let response = match self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("LLM transport error: {e}");
                return Ok(Attempt::Retry(LlmError::Http(e)));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(Attempt::Done(response.json().await?));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), "Could not read LLM error body: {e}");
                String::new()
            }
        };
        let error = LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(body, status),
        };
        if is_retryable(status) {
            warn!(status = status.as_u16(), "LLM API error: {error}");
            Ok(Attempt::Retry(error))
        } else {
            Err(error)
        }
    }

    /// Trimmed completion text. A missing or whitespace-only completion is
    /// `LlmError::EmptyContent`.
    pub async fn call_text(
        &self,
        prompt: &str,
        system: &str,
        user_id: Option<&str>,
    ) -> Result<String, LlmError> {
        let completion = self.call(prompt, system, user_id).await?;
        non_empty_text(completion.text())
    }

    /// Completion text parsed as JSON. The prompt must ask for JSON only;
    /// surrounding code fences are tolerated.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let completion = self.call(prompt, system, None).await?;
        let text = completion.text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(strip_json_fences(text))?)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 1s before the second attempt, 2s before the third.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1))
}

/// The provider's error message when the body is its JSON envelope, else the
/// raw body. An empty body falls back to the status reason.
fn api_error_message(body: String, status: StatusCode) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

fn non_empty_text(text: Option<&str>) -> Result<String, LlmError> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(LlmError::EmptyContent),
    }
}

/// Strips a ```json or bare ``` fence around model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").map_or(inner, str::trim)
}
