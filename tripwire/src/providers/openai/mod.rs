//! `OpenAI`-compatible Chat Completions provider.

mod client;
mod completion;

pub use client::{
    AZURE_DEFAULT_API_VERSION, AuthStyle, OPENAI_API_BASE_URL, OpenAIClient, OpenAIClientBuilder,
};
pub use completion::CompletionModel;
