//! The moderation guardrail: one classification call per check, failing open.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::error::{Result, TransportError};
use crate::providers::{CompletionProvider, SchemaDescriptor};

use super::output::{OutputGuardrail, OutputGuardrailCheck};
use super::{GuardrailOutput, GuardrailResult, PromptBuilder, normalize, validate};

/// Name the moderation guardrail is registered under.
pub const MODERATION_GUARDRAIL_NAME: &str = "moderation_guardrail";

/// Deadline applied to the provider call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Classifies agent output against the moderation policy.
///
/// [`check`](Self::check) never fails: any transport, normalization or
/// validation error yields [`GuardrailResult::failed`], which does not trip.
/// Use [`classify`](Self::classify) to see the underlying error instead.
///
/// The guardrail holds no mutable state and can serve concurrent checks.
#[derive(Debug, Clone)]
pub struct ModerationGuardrail<P> {
    provider: P,
    prompt: PromptBuilder,
    schema: SchemaDescriptor,
    timeout: Option<Duration>,
}

impl<P: CompletionProvider> ModerationGuardrail<P> {
    /// Create a guardrail with the default company context and deadline.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::builder(provider).build()
    }

    /// Create a builder around `provider`.
    #[must_use]
    pub fn builder(provider: P) -> ModerationGuardrailBuilder<P> {
        ModerationGuardrailBuilder {
            provider,
            prompt: PromptBuilder::default(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// The wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The prompt builder in use.
    pub const fn prompt(&self) -> &PromptBuilder {
        &self.prompt
    }

    /// The provider deadline, if any.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the pipeline and surface the first error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if the provider
    /// call fails or misses the deadline,
    /// [`Error::Normalization`](crate::Error::Normalization) if the response
    /// has no usable structured output, and
    /// [`Error::Validation`](crate::Error::Validation) if that output does not
    /// match the schema.
    #[instrument(skip_all, fields(provider = self.provider.provider(), model = self.provider.model_id()))]
    pub async fn classify(&self, message: &str) -> Result<GuardrailOutput> {
        let request = self.prompt.build(message);

        let call = self.provider.complete(&request, &self.schema);
        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| TransportError::timeout(limit))??,
            None => call.await?,
        };

        let candidate = normalize(&raw)?;
        Ok(validate(candidate)?)
    }

    /// Classify `message` and decide whether to trip.
    ///
    /// Never fails; see the type-level docs.
    pub async fn check(&self, message: &str) -> GuardrailResult {
        match self.classify(message).await {
            Ok(output) => {
                debug!(
                    category = %output.moderation_category,
                    triggered = output.moderation_category.trips(),
                    "Guardrail classified output"
                );
                GuardrailResult::classified(output)
            }
            Err(error) => {
                warn!(error.kind = error.kind(), %error, "Guardrail check failed");
                GuardrailResult::failed()
            }
        }
    }
}

impl<P: CompletionProvider + 'static> ModerationGuardrail<P> {
    /// Wrap as a named [`OutputGuardrail`] called `moderation_guardrail`.
    #[must_use]
    pub fn into_output_guardrail(self) -> OutputGuardrail {
        OutputGuardrail::new(MODERATION_GUARDRAIL_NAME, self)
    }
}

#[async_trait]
impl<P: CompletionProvider> OutputGuardrailCheck for ModerationGuardrail<P> {
    async fn check(&self, agent_output: &str) -> GuardrailResult {
        Self::check(self, agent_output).await
    }
}

/// Builder for [`ModerationGuardrail`].
#[derive(Debug)]
pub struct ModerationGuardrailBuilder<P> {
    provider: P,
    prompt: PromptBuilder,
    timeout: Option<Duration>,
}

impl<P: CompletionProvider> ModerationGuardrailBuilder<P> {
    /// Set the company or brand the classifier protects.
    #[must_use]
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.prompt = PromptBuilder::new(company);
        self
    }

    /// Set the provider deadline.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait for the provider without a deadline.
    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Build the guardrail.
    #[must_use]
    pub fn build(self) -> ModerationGuardrail<P> {
        ModerationGuardrail {
            provider: self.provider,
            prompt: self.prompt,
            schema: SchemaDescriptor::guardrail_output(),
            timeout: self.timeout,
        }
    }
}
