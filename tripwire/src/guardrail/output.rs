//! Output guardrail types and traits.
//!
//! Output guardrails inspect the agent's final output before it is delivered.
//! A check always produces a [`GuardrailResult`]; deciding what to do with a
//! triggered tripwire is up to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use super::GuardrailResult;

/// Trait for implementing output guardrail check logic.
#[async_trait]
pub trait OutputGuardrailCheck: Send + Sync {
    /// Check the agent's output. Implementations must not fail; errors are
    /// folded into the returned result.
    async fn check(&self, agent_output: &str) -> GuardrailResult;
}

/// A named output guardrail.
#[derive(Clone)]
pub struct OutputGuardrail {
    /// Name of this guardrail (used in tracing and results).
    name: String,

    /// The guardrail check implementation.
    check: Arc<dyn OutputGuardrailCheck>,
}

impl OutputGuardrail {
    /// Create a new output guardrail with the given name and check logic.
    #[must_use]
    pub fn new(name: impl Into<String>, check: impl OutputGuardrailCheck + 'static) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Returns the name of this guardrail.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute this guardrail check.
    pub async fn run(&self, agent_output: &str) -> OutputGuardrailResult {
        let result = self.check.check(agent_output).await;
        OutputGuardrailResult {
            guardrail_name: self.name.clone(),
            agent_output: agent_output.to_owned(),
            result,
        }
    }
}

impl std::fmt::Debug for OutputGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputGuardrail")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The result of running an output guardrail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGuardrailResult {
    /// Name of the guardrail that produced this result.
    pub guardrail_name: String,

    /// The agent output that was checked.
    pub agent_output: String,

    /// The guardrail decision.
    pub result: GuardrailResult,
}

impl OutputGuardrailResult {
    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.result.tripwire_triggered
    }
}

/// Run every guardrail on `agent_output` concurrently.
///
/// Results come back in the order of `guardrails`.
pub async fn run_output_guardrails(
    guardrails: &[OutputGuardrail],
    agent_output: &str,
) -> Vec<OutputGuardrailResult> {
    join_all(guardrails.iter().map(|g| g.run(agent_output))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::{GuardrailOutput, ModerationCategory};

    struct Keyword(&'static str);

    #[async_trait]
    impl OutputGuardrailCheck for Keyword {
        async fn check(&self, agent_output: &str) -> GuardrailResult {
            let category = if agent_output.contains(self.0) {
                ModerationCategory::Offensive
            } else {
                ModerationCategory::None
            };
            GuardrailResult::classified(GuardrailOutput::new(category, "keyword match"))
        }
    }

    #[tokio::test]
    async fn test_run_reports_name_and_output() {
        let guardrail = OutputGuardrail::new("keyword", Keyword("darn"));
        let result = guardrail.run("well darn").await;
        assert_eq!(result.guardrail_name, "keyword");
        assert_eq!(result.agent_output, "well darn");
        assert!(result.is_triggered());
    }

    #[tokio::test]
    async fn test_run_many_preserves_order() {
        let guardrails = vec![
            OutputGuardrail::new("a", Keyword("zzz")),
            OutputGuardrail::new("b", Keyword("hello")),
        ];
        let results = run_output_guardrails(&guardrails, "hello world").await;
        let names: Vec<_> = results.iter().map(|r| r.guardrail_name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!results[0].is_triggered());
        assert!(results[1].is_triggered());
    }
}
