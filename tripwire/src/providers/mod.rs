//! Completion providers used by the guardrail to classify text.
//!
//! Every provider implements [`CompletionProvider`], which takes a
//! [`ClassificationRequest`] plus a [`SchemaDescriptor`] and returns the raw
//! JSON response. Making sense of that response is left to the guardrail.
//!
//! # Supported Providers
//!
//! - **`OpenAI`**: Chat Completions with `json_schema` structured output,
//!   including Azure `OpenAI` deployments
//! - **Responses proxy**: any endpoint accepting the Responses-style
//!   `{model, input, text: {format}}` request
//! - **Mock**: canned responses for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use tripwire::providers::openai::OpenAIClient;
//! use tripwire::providers::{FromEnv, ResponsesProxy};
//!
//! let openai = OpenAIClient::from_env()?;
//! let gpt = openai.completion_model("gpt-4.1");
//!
//! let proxy = ResponsesProxy::builder()
//!     .endpoint("http://localhost:3000/api/responses")
//!     .build()?;
//! ```

mod config;
mod schema;

pub mod mock;
pub mod openai;
pub mod responses;

pub use config::HttpClientConfig;
pub use mock::MockProvider;
pub use openai::OpenAIClient;
pub use responses::ResponsesProxy;
pub use schema::SchemaDescriptor;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::TransportError;
use crate::guardrail::ClassificationRequest;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// A capability that answers a classification request with structured output.
///
/// Implementations perform exactly one outbound call per invocation and
/// return the response body untouched. Failures to obtain a response
/// (network errors, non-success statuses, unreadable bodies) are
/// [`TransportError`]s.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name (e.g., "openai", "responses").
    fn provider(&self) -> &'static str {
        "unknown"
    }

    /// Get the model identifier the request is sent to.
    fn model_id(&self) -> &str;

    /// Send `request`, asking for output conforming to `schema`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the call does not complete successfully.
    async fn complete(
        &self,
        request: &ClassificationRequest,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<P> {
    fn provider(&self) -> &'static str {
        (**self).provider()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn complete(
        &self,
        request: &ClassificationRequest,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        (**self).complete(request, schema).await
    }
}

/// Trait for providers that can be created from environment variables.
pub trait FromEnv: Sized {
    /// Create a new client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are not set.
    fn from_env() -> Result<Self, TransportError>;
}

/// Base configuration for API clients.
pub trait ApiClient: Clone + Send + Sync {
    /// Get the base URL for API requests.
    fn base_url(&self) -> &str;

    /// Get the HTTP client instance.
    fn http_client(&self) -> &reqwest::Client;

    /// Build authentication headers for API requests.
    fn auth_headers(&self) -> HeaderMap;
}

/// POST `body` as JSON and return the JSON response.
///
/// Non-success statuses become [`TransportError::http_status`] with the
/// response text; a body that is not JSON becomes
/// [`TransportError::response_format`].
pub(crate) async fn post_json(
    http: &reqwest::Client,
    url: url::Url,
    headers: HeaderMap,
    body: &Value,
) -> Result<Value, TransportError> {
    let response = http.post(url).headers(headers).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(TransportError::http_status(status.as_u16(), error_text));
    }

    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| TransportError::response_format(format!("Response body is not JSON: {e}")))
}
