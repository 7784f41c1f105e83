#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tripwire is a fail-open moderation guardrail for agent output.
//!
//! It asks a completion provider to classify a piece of text against a fixed
//! moderation policy using structured output, validates the answer strictly,
//! and turns it into a tripwire decision. When classification fails for any
//! reason the guardrail does not trip and reports `guardrail_failed` instead.
//!
//! See [`guardrail`] for the pipeline and [`providers`] for the backends.

pub mod error;
pub mod guardrail;
pub mod message;
pub mod prelude;
pub mod providers;

pub use error::{Error, NormalizationError, Result, TransportError, ValidationError};
pub use guardrail::{GuardrailOutput, GuardrailResult, ModerationCategory, ModerationGuardrail};
