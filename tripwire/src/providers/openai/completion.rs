//! `OpenAI` Chat Completions API implementation.
//!
//! Implements [`CompletionProvider`] by sending the classification request
//! with a `json_schema` response format. The structured output comes back as
//! a JSON string in `choices[0].message.content`.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::client::OpenAIClient;
use crate::error::TransportError;
use crate::guardrail::ClassificationRequest;
use crate::providers::{ApiClient, CompletionProvider, SchemaDescriptor, post_json};

/// `OpenAI` Chat Completion model.
#[derive(Clone)]
pub struct CompletionModel {
    client: OpenAIClient,
    model_id: String,
    /// Sampling temperature, omitted from the request when unset.
    pub temperature: Option<f32>,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl CompletionModel {
    pub(crate) fn new(client: OpenAIClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the request body for the API.
    pub(crate) fn build_request_body(
        &self,
        request: &ClassificationRequest,
        schema: &SchemaDescriptor,
    ) -> Value {
        let mut body = json!({
            "model": self.model_id,
            "messages": request.messages(),
            "stream": false,
            "response_format": schema.response_format(),
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }
}

#[async_trait]
impl CompletionProvider for CompletionModel {
    fn provider(&self) -> &'static str {
        "openai"
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
        debug!(schema = %schema.name, "Sending request to OpenAI API");

        let json = post_json(
            self.client.http_client(),
            self.client.chat_completions_url().clone(),
            self.client.auth_headers(),
            &body,
        )
        .await
        .map_err(|e| e.with_provider("openai"))?;

        debug!(response = %json, "OpenAI API response");
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::PromptBuilder;

    #[test]
    fn test_request_body_reshapes_schema() {
        let model = OpenAIClient::new("k").unwrap().completion_model("gpt-4.1");
        let request = PromptBuilder::default().build("hello there");
        let schema = SchemaDescriptor::guardrail_output();

        let body = model.build_request_body(&request, &schema);

        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hello there"}));
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "output_format");
        assert_eq!(body["response_format"]["json_schema"]["schema"], schema.schema);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_temperature_included_when_set() {
        let model = OpenAIClient::new("k")
            .unwrap()
            .completion_model("gpt-4.1")
            .with_temperature(0.0);
        let body = model.build_request_body(
            &PromptBuilder::default().build("x"),
            &SchemaDescriptor::guardrail_output(),
        );
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(model.provider(), "openai");
        assert_eq!(model.model_id(), "gpt-4.1");
    }
}
