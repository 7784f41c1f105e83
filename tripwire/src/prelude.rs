//! Commonly used types, re-exported for glob import.

pub use crate::error::{
    Error, NormalizationError, Result, TransportError, TransportErrorKind, ValidationError,
};
pub use crate::guardrail::{
    ClassificationRequest, GuardrailOutput, GuardrailResult, ModerationCategory,
    ModerationGuardrail, OutputGuardrail, OutputGuardrailCheck, OutputInfo, PromptBuilder,
};
pub use crate::message::{ChatMessage, Role};
pub use crate::providers::openai::OpenAIClient;
pub use crate::providers::{
    CompletionProvider, FromEnv, MockProvider, ResponsesProxy, SchemaDescriptor,
};
