//! Guardrail construction from command-line options.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::ValueEnum;
use tripwire::guardrail::DEFAULT_COMPANY;
use tripwire::providers::{CompletionProvider, DEFAULT_MODEL, OpenAIClient, ResponsesProxy};
use tripwire::{GuardrailResult, ModerationGuardrail};

/// Exit status used when `--fail-on-trip` is set and the tripwire fires.
pub const TRIPPED_EXIT_CODE: i32 = 2;

/// Supported provider backends.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// `OpenAI` Chat Completions
    #[default]
    Openai,
    /// Azure `OpenAI` deployment (`--base-url` is the resource endpoint)
    Azure,
    /// Responses-style proxy endpoint (`--endpoint`)
    Proxy,
}

/// Options needed to build a guardrail.
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Which backend to use.
    pub provider: ProviderKind,
    /// Model id, or deployment name for Azure.
    pub model: Option<String>,
    /// API base URL, or resource endpoint for Azure.
    pub base_url: Option<String>,
    /// API key (bearer token for the proxy).
    pub api_key: Option<String>,
    /// `api-version` query parameter.
    pub api_version: Option<String>,
    /// Proxy endpoint URL.
    pub endpoint: Option<String>,
    /// Company or brand the classifier protects.
    pub company: Option<String>,
    /// Provider deadline in seconds; `0` disables it.
    pub timeout_secs: u64,
}

fn build_provider(config: &CheckConfig) -> anyhow::Result<Arc<dyn CompletionProvider>> {
    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::Openai => {
            let api_key = config
                .api_key
                .clone()
                .context("an API key is required (--api-key or OPENAI_API_KEY)")?;
            let mut builder = OpenAIClient::builder().api_key(api_key);
            if let Some(base_url) = &config.base_url {
                builder = builder.base_url(base_url);
            }
            if let Some(version) = &config.api_version {
                builder = builder.api_version(version);
            }
            Arc::new(builder.build()?.completion_model(model))
        }
        ProviderKind::Azure => {
            let Some(endpoint) = &config.base_url else {
                bail!("--base-url must point at the Azure resource endpoint");
            };
            let api_key = config
                .api_key
                .clone()
                .context("an API key is required (--api-key or OPENAI_API_KEY)")?;
            let mut builder = OpenAIClient::builder().api_key(api_key);
            if let Some(version) = &config.api_version {
                builder = builder.api_version(version);
            }
            let client = builder.azure_deployment(endpoint, model).build()?;
            Arc::new(client.completion_model(model))
        }
        ProviderKind::Proxy => {
            let Some(endpoint) = &config.endpoint else {
                bail!("--endpoint is required for the proxy provider");
            };
            let mut builder = ResponsesProxy::builder().endpoint(endpoint).model(model);
            if let Some(token) = &config.api_key {
                builder = builder.bearer_token(token);
            }
            Arc::new(builder.build()?)
        }
    };

    Ok(provider)
}

/// Build the moderation guardrail described by `config`.
///
/// # Errors
///
/// Returns an error if a required option for the chosen provider is missing
/// or the provider cannot be constructed.
pub fn build_guardrail(
    config: &CheckConfig,
) -> anyhow::Result<ModerationGuardrail<Arc<dyn CompletionProvider>>> {
    let provider = build_provider(config)?;

    let mut builder = ModerationGuardrail::builder(provider)
        .company(config.company.as_deref().unwrap_or(DEFAULT_COMPANY));
    builder = if config.timeout_secs == 0 {
        builder.no_timeout()
    } else {
        builder.timeout(Duration::from_secs(config.timeout_secs))
    };

    Ok(builder.build())
}

/// Process exit status for `result`.
#[must_use]
pub const fn exit_code(result: &GuardrailResult, fail_on_trip: bool) -> i32 {
    if fail_on_trip && result.tripwire_triggered {
        TRIPPED_EXIT_CODE
    } else {
        0
    }
}
