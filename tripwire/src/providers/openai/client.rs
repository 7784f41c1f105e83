//! `OpenAI` API client implementation.
//!
//! Provides a client for OpenAI's Chat Completions API and compatible
//! deployments such as Azure `OpenAI`.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::completion::CompletionModel;
use crate::error::TransportError;
use crate::providers::config::HttpClientConfig;
use crate::providers::{ApiClient, FromEnv};

/// Default `OpenAI` API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// API version used for Azure deployments unless overridden.
pub const AZURE_DEFAULT_API_VERSION: &str = "2024-08-01-preview";

/// How the API key is presented to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`.
    #[default]
    Bearer,
    /// `api-key: <key>`, as Azure `OpenAI` expects.
    AzureApiKey,
}

/// `OpenAI` API client for creating completion models.
///
/// # Example
///
/// ```rust,ignore
/// use tripwire::providers::openai::OpenAIClient;
///
/// let client = OpenAIClient::new("sk-...")?;
///
/// let azure = OpenAIClient::builder()
///     .api_key(key)
///     .azure_deployment("https://my-resource.openai.azure.com", "gpt-4.1")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
    chat_url: Arc<Url>,
    auth_style: AuthStyle,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("auth_style", &self.auth_style)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    /// Create a new `OpenAI` client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TransportError> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    /// Create a completion model with the specified model ID.
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> CompletionModel {
        CompletionModel::new(self.clone(), model_id)
    }

    /// Full URL of the chat completions endpoint, including any `api-version`.
    #[must_use]
    pub fn chat_completions_url(&self) -> &Url {
        &self.chat_url
    }

    /// How the key is sent.
    #[must_use]
    pub const fn auth_style(&self) -> AuthStyle {
        self.auth_style
    }
}

impl ApiClient for OpenAIClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);

        match self.auth_style {
            AuthStyle::Bearer => {
                if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
                    headers.insert(AUTHORIZATION, value);
                }
            }
            AuthStyle::AzureApiKey => {
                if let Ok(value) = HeaderValue::from_str(&self.api_key) {
                    headers.insert(HeaderName::from_static("api-key"), value);
                }
            }
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

impl FromEnv for OpenAIClient {
    /// Create a new `OpenAI` client from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY` (required): The API key
    /// - `OPENAI_BASE_URL` (optional): Custom base URL
    /// - `OPENAI_API_VERSION` (optional): Appended as `api-version`
    fn from_env() -> Result<Self, TransportError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            TransportError::provider("openai", "OPENAI_API_KEY environment variable not set")
        })?;

        let mut builder = Self::builder().api_key(api_key);

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Ok(version) = std::env::var("OPENAI_API_VERSION") {
            builder = builder.api_version(version);
        }

        builder.build()
    }
}

/// Builder for [`OpenAIClient`].
#[derive(Debug, Default)]
pub struct OpenAIClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    auth_style: AuthStyle,
    http: HttpClientConfig,
}

impl OpenAIClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL (the part before `/chat/completions`).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Append `api-version=<version>` to every request.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set how the API key is sent.
    #[must_use]
    pub const fn auth_style(mut self, style: AuthStyle) -> Self {
        self.auth_style = style;
        self
    }

    /// Target an Azure `OpenAI` deployment.
    ///
    /// Sets the deployment base URL, `api-key` authentication, and the
    /// default API version unless one was already set.
    #[must_use]
    pub fn azure_deployment(mut self, endpoint: &str, deployment: &str) -> Self {
        self.base_url = Some(format!(
            "{}/openai/deployments/{deployment}",
            endpoint.trim_end_matches('/')
        ));
        self.auth_style = AuthStyle::AzureApiKey;
        if self.api_version.is_none() {
            self.api_version = Some(AZURE_DEFAULT_API_VERSION.to_owned());
        }
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.http.timeout_secs = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, the base URL is invalid,
    /// or the HTTP client fails to build.
    pub fn build(self) -> Result<OpenAIClient, TransportError> {
        let api_key = self
            .api_key
            .ok_or_else(|| TransportError::provider("openai", "API key is required"))?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| OPENAI_API_BASE_URL.to_owned());

        let mut chat_url = Url::parse(&format!(
            "{}/chat/completions",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| TransportError::provider("openai", format!("Invalid base URL `{base_url}`: {e}")))?;
        if let Some(version) = &self.api_version {
            chat_url.query_pairs_mut().append_pair("api-version", version);
        }

        Ok(OpenAIClient {
            http_client: self.http.build_client()?,
            api_key: api_key.into(),
            base_url: base_url.into(),
            chat_url: Arc::new(chat_url),
            auth_style: self.auth_style,
        })
    }
}
