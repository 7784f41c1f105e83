//! Mock completion provider for deterministic testing.
//!
//! Returns pre-configured responses without making any HTTP calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::TransportError;
use crate::guardrail::{ClassificationRequest, ModerationCategory};
use crate::providers::{CompletionProvider, SchemaDescriptor};

/// A pre-configured reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this body.
    Json(Value),
    /// Fail with this error.
    Error(TransportError),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<MockResponse>,
    requests: Vec<ClassificationRequest>,
}

/// A mock provider that returns pre-configured responses.
///
/// Queued responses are served first, in order; after that every call gets
/// the fallback response. Every request is recorded.
///
/// # Example
///
/// ```rust,ignore
/// let provider = MockProvider::classifying(ModerationCategory::Offensive, "Contains insult.");
/// let guardrail = ModerationGuardrail::new(provider.clone());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    fallback: Option<MockResponse>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a provider with no responses configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always return `body`.
    #[must_use]
    pub fn fixed(body: Value) -> Self {
        Self {
            fallback: Some(MockResponse::Json(body)),
            ..Self::default()
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self {
            fallback: Some(MockResponse::Error(error)),
            ..Self::default()
        }
    }

    /// Always answer with `{"output_parsed": {category, rationale}}`.
    #[must_use]
    pub fn classifying(category: ModerationCategory, rationale: &str) -> Self {
        Self::fixed(json!({
            "output_parsed": {
                "moderationCategory": category.as_str(),
                "moderationRationale": rationale,
            }
        }))
    }

    /// Queue a response body.
    #[must_use]
    pub fn with_response(self, body: Value) -> Self {
        self.lock().queue.push_back(MockResponse::Json(body));
        self
    }

    /// Queue an error.
    #[must_use]
    pub fn with_error(self, error: TransportError) -> Self {
        self.lock().queue.push_back(MockResponse::Error(error));
        self
    }

    /// Wait this long before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.lock().requests.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: &ClassificationRequest,
        _schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        let response = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            state.queue.pop_front().or_else(|| self.fallback.clone())
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            Some(MockResponse::Json(body)) => Ok(body),
            Some(MockResponse::Error(error)) => Err(error),
            None => Err(TransportError::provider("mock", "no response configured")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::PromptBuilder;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let provider = MockProvider::fixed(json!({"n": 0}))
            .with_response(json!({"n": 1}))
            .with_error(TransportError::network("down"));
        let request = PromptBuilder::default().build("x");
        let schema = SchemaDescriptor::guardrail_output();

        assert_eq!(provider.complete(&request, &schema).await.unwrap(), json!({"n": 1}));
        assert!(provider.complete(&request, &schema).await.is_err());
        assert_eq!(provider.complete(&request, &schema).await.unwrap(), json!({"n": 0}));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unconfigured_fails() {
        let provider = MockProvider::new();
        let result = provider
            .complete(
                &PromptBuilder::default().build("x"),
                &SchemaDescriptor::guardrail_output(),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(provider.requests()[0].message(), "x");
    }
}
