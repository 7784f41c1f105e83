//! Tripwire CLI library: provider wiring for the `tripwire` binary.
//!
//! This crate turns command-line options into a configured
//! [`ModerationGuardrail`](tripwire::ModerationGuardrail).

pub mod check;

pub use check::{CheckConfig, ProviderKind, build_guardrail, exit_code};
