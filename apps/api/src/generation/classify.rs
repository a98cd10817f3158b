//! Generation failure taxonomy.
//!
//! `classify_error_message` is a pure function over the provider's error text
//! so callers (and tests) can decide retry policy without a live endpoint.

use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    RateLimit,
    ContentPolicy,
    Authorization,
    ServerError,
    NetworkError,
    Timeout,
    Unknown,
}

impl GenerationErrorKind {
    /// rate_limit, server_error, network_error and timeout may succeed on retry.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::RateLimit
                | GenerationErrorKind::ServerError
                | GenerationErrorKind::NetworkError
                | GenerationErrorKind::Timeout
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationErrorKind::RateLimit => "rate_limit",
            GenerationErrorKind::ContentPolicy => "content_policy",
            GenerationErrorKind::Authorization => "authorization",
            GenerationErrorKind::ServerError => "server_error",
            GenerationErrorKind::NetworkError => "network_error",
            GenerationErrorKind::Timeout => "timeout",
            GenerationErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive substring patterns, checked in order. First hit wins.
const PATTERNS: &[(GenerationErrorKind, &[&str])] = &[
    (GenerationErrorKind::RateLimit, &["rate limit", "429"]),
    (
        GenerationErrorKind::ContentPolicy,
        &["content policy", "content filter"],
    ),
    (
        GenerationErrorKind::Authorization,
        &["API key", "403", "authentication"],
    ),
    (GenerationErrorKind::ServerError, &["500", "502", "503"]),
    (GenerationErrorKind::NetworkError, &["network", "connection"]),
    (GenerationErrorKind::Timeout, &["timeout"]),
];

pub fn classify_error_message(message: &str) -> GenerationErrorKind {
    PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| message.contains(n)))
        .map(|(kind, _)| *kind)
        .unwrap_or(GenerationErrorKind::Unknown)
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("{kind} error during generation: {message}")]
    Classified {
        kind: GenerationErrorKind,
        message: String,
    },

    #[error("Generation returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        GenerationError::Classified {
            kind: classify_error_message(&message),
            message,
        }
    }

    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::Classified { kind, .. } => *kind,
            GenerationError::EmptyCompletion => GenerationErrorKind::Unknown,
        }
    }

    pub fn retryable(&self) -> bool {
        self.kind().retryable()
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match &err {
            LlmError::EmptyContent => GenerationError::EmptyCompletion,
            // reqwest phrases these without the keywords the classifier looks for.
            LlmError::Http(e) if e.is_timeout() => GenerationError::Classified {
                kind: GenerationErrorKind::Timeout,
                message: err.to_string(),
            },
            LlmError::Http(e) if e.is_connect() => GenerationError::Classified {
                kind: GenerationErrorKind::NetworkError,
                message: err.to_string(),
            },
            LlmError::RateLimited { .. } => GenerationError::Classified {
                kind: GenerationErrorKind::RateLimit,
                message: err.to_string(),
            },
            _ => GenerationError::from_message(err.to_string()),
        }
    }
}
