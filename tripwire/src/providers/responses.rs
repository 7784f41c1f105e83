//! Responses-style proxy provider.
//!
//! Sends `{model, input, text: {format}}` to a single endpoint, typically an
//! application route that forwards to a hosted model and returns either
//! `output_parsed` or a Chat Completions body.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use crate::error::TransportError;
use crate::guardrail::ClassificationRequest;
use crate::providers::config::HttpClientConfig;
use crate::providers::{ApiClient, CompletionProvider, DEFAULT_MODEL, SchemaDescriptor, post_json};

/// Provider that posts Responses-style requests to a fixed endpoint.
#[derive(Clone)]
pub struct ResponsesProxy {
    http_client: reqwest::Client,
    endpoint: Arc<Url>,
    bearer: Option<Arc<str>>,
    model_id: String,
}

impl std::fmt::Debug for ResponsesProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsesProxy")
            .field("endpoint", &self.endpoint.as_str())
            .field("model_id", &self.model_id)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ResponsesProxy {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> ResponsesProxyBuilder {
        ResponsesProxyBuilder::default()
    }

    /// Build the request body for the endpoint.
    #[must_use]
    pub fn build_request_body(
        &self,
        request: &ClassificationRequest,
        schema: &SchemaDescriptor,
    ) -> Value {
        json!({
            "model": self.model_id,
            "input": request.messages(),
            "text": { "format": schema.text_format() },
        })
    }
}

impl ApiClient for ResponsesProxy {
    fn base_url(&self) -> &str {
        self.endpoint.as_str()
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        if let Some(token) = &self.bearer
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl CompletionProvider for ResponsesProxy {
    fn provider(&self) -> &'static str {
        "responses"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    #[instrument(skip(self, request, schema), fields(model = %self.model_id))]
    async fn complete(
        &self,
        request: &ClassificationRequest,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        let body = self.build_request_body(request, schema);
        debug!(endpoint = %self.endpoint, "Sending request to responses endpoint");

        let json = post_json(
            &self.http_client,
            (*self.endpoint).clone(),
            self.auth_headers(),
            &body,
        )
        .await
        .map_err(|e| e.with_provider("responses"))?;

        debug!(response = %json, "Responses endpoint response");
        Ok(json)
    }
}

/// Builder for [`ResponsesProxy`].
#[derive(Debug, Default)]
pub struct ResponsesProxyBuilder {
    endpoint: Option<String>,
    bearer: Option<String>,
    model_id: Option<String>,
    http: HttpClientConfig,
}

impl ResponsesProxyBuilder {
    /// Set the full endpoint URL (e.g., `http://localhost:3000/api/responses`).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Set the model identifier placed in the request body.
    #[must_use]
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.http.timeout_secs = Some(timeout);
        self
    }

    /// Build the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is missing or invalid, or the HTTP
    /// client fails to build.
    pub fn build(self) -> Result<ResponsesProxy, TransportError> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| TransportError::provider("responses", "endpoint is required"))?;
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            TransportError::provider("responses", format!("Invalid endpoint `{endpoint}`: {e}"))
        })?;

        Ok(ResponsesProxy {
            http_client: self.http.build_client()?,
            endpoint: Arc::new(endpoint),
            bearer: self.bearer.map(Into::into),
            model_id: self.model_id.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        })
    }
}
