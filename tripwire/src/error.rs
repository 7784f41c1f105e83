//! Unified error types for the guardrail pipeline.
//!
//! Each stage of the classification pipeline has its own error:
//! - [`TransportError`] for the provider call
//! - [`NormalizationError`] for extracting a candidate from the raw response
//! - [`ValidationError`] for checking the candidate against the output schema
//!
//! They surface unchanged up to the moderation gate, which is the only place
//! that recovers from them.

use std::fmt;

/// Result type alias for tripwire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the guardrail pipeline.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The provider call did not complete successfully.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The provider response had no recognizable structured output.
    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    /// The structured output did not match the guardrail schema.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Short label of the pipeline stage that failed, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Normalization(_) => "normalization",
            Self::Validation(_) => "validation",
        }
    }
}

/// Error raised by a [`CompletionProvider`](crate::providers::CompletionProvider).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TransportError {
    /// The error kind.
    pub kind: TransportErrorKind,
    /// The provider name (e.g., "openai", "responses").
    pub provider: Option<String>,
    /// Additional error message.
    pub message: String,
    /// Optional status or error code.
    pub code: Option<String>,
}

/// Categories of transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// Network or connection error.
    Network,
    /// The call did not settle before the deadline.
    Timeout,
    /// Non-success HTTP status.
    HttpStatus,
    /// The body could not be read as JSON.
    ResponseFormat,
    /// Provider-specific or configuration error.
    Provider,
}

impl TransportError {
    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            provider: None,
            message: message.into(),
            code: None,
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(after: std::time::Duration) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            provider: None,
            message: format!("Provider call did not settle within {}ms", after.as_millis()),
            code: None,
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::HttpStatus,
            provider: None,
            message: format!("HTTP {status}: {}", body.into()),
            code: Some(status.to_string()),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::ResponseFormat,
            provider: None,
            message: message.into(),
            code: None,
        }
    }

    /// Create a provider-specific error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Provider,
            provider: Some(provider.into()),
            message: message.into(),
            code: None,
        }
    }

    /// Attach the provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self {
                kind: TransportErrorKind::Timeout,
                provider: None,
                message: "Request timed out".into(),
                code: None,
            }
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::response_format(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// The raw response did not yield a candidate value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum NormalizationError {
    /// `choices[0].message.content` exists but is not a string.
    #[error("Message content is not a string")]
    NotAString,

    /// The message content is empty or whitespace only.
    #[error("Message content is empty")]
    Empty,

    /// The message content is not valid JSON.
    #[error("Invalid JSON in API response: {0}")]
    InvalidJson(String),

    /// Neither `output_parsed` nor message content were present.
    #[error("No parseable content found in response (keys: {})", .keys.join(", "))]
    NoCandidate {
        /// Top-level keys of the response, sorted.
        keys: Vec<String>,
    },
}

/// The candidate value does not conform to the guardrail output schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse guardrail output at '{path}': {message}")]
pub struct ValidationError {
    /// JSON path of the offending field (`.` for the root).
    pub path: String,
    /// Description of the mismatch.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
