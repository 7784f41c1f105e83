//! Moderation checks for agent output.
//!
//! The moderation guardrail classifies a piece of agent output against a
//! fixed policy and reports whether it should be suppressed. The pipeline is:
//!
//! 1. [`PromptBuilder`] renders a [`ClassificationRequest`].
//! 2. A [`CompletionProvider`](crate::providers::CompletionProvider) returns a
//!    raw JSON response.
//! 3. [`normalize`] extracts a candidate value from the response.
//! 4. [`validate`] turns the candidate into a [`GuardrailOutput`].
//! 5. [`ModerationGuardrail`] maps the output to a [`GuardrailResult`].
//!
//! # Tripwire Mechanism
//!
//! The result carries a `tripwire_triggered` flag, set for every category
//! other than [`ModerationCategory::None`]. Any failure in steps 2-4 produces
//! an untriggered result whose `output_info` is `{"error": "guardrail_failed"}`:
//! the gate fails open.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tripwire::prelude::*;
//!
//! let client = OpenAIClient::new("sk-...")?;
//! let guardrail = ModerationGuardrail::new(client.completion_model("gpt-4.1"));
//!
//! let result = guardrail.check("You are all idiots").await;
//! if result.is_triggered() {
//!     // suppress the agent output
//! }
//! ```

mod moderation;
mod normalize;
mod output;
mod prompt;
mod validate;

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

pub use moderation::{
    DEFAULT_TIMEOUT, MODERATION_GUARDRAIL_NAME, ModerationGuardrail, ModerationGuardrailBuilder,
};
pub use normalize::{ResponseShape, normalize};
pub use output::{
    OutputGuardrail, OutputGuardrailCheck, OutputGuardrailResult, run_output_guardrails,
};
pub use prompt::{
    ClassificationRequest, DEFAULT_COMPANY, POLICY_CATEGORIES, PolicyCategory, PromptBuilder,
};
pub use validate::validate;

/// Marker placed in `output_info` when classification failed.
pub const GUARDRAIL_FAILED: &str = "guardrail_failed";

/// The closed set of moderation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum ModerationCategory {
    /// Hate speech, discriminatory language, insults, slurs, or harassment.
    Offensive,
    /// Disparaging discussion of competitors.
    OffBrand,
    /// Threats, incitement of harm, or graphic violence.
    Violence,
    /// Nothing objectionable.
    None,
}

impl ModerationCategory {
    /// All categories, in policy order.
    pub const ALL: [Self; 4] = [Self::Offensive, Self::OffBrand, Self::Violence, Self::None];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offensive => "OFFENSIVE",
            Self::OffBrand => "OFF_BRAND",
            Self::Violence => "VIOLENCE",
            Self::None => "NONE",
        }
    }

    /// Whether this category trips the guardrail.
    #[must_use]
    pub const fn trips(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for ModerationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModerationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown moderation category `{s}`, expected one of OFFENSIVE, OFF_BRAND, VIOLENCE, NONE"
                )
            })
    }
}

impl TryFrom<String> for ModerationCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl JsonSchema for ModerationCategory {
    fn schema_name() -> Cow<'static, str> {
        "ModerationCategory".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "enum": ["OFFENSIVE", "OFF_BRAND", "VIOLENCE", "NONE"]
        })
    }
}

/// A validated classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailOutput {
    /// The policy category the text falls under.
    pub moderation_category: ModerationCategory,
    /// Short explanation of the classification.
    pub moderation_rationale: String,
}

impl GuardrailOutput {
    /// Create a classification.
    #[must_use]
    pub fn new(category: ModerationCategory, rationale: impl Into<String>) -> Self {
        Self {
            moderation_category: category,
            moderation_rationale: rationale.into(),
        }
    }
}

/// Diagnostic detail attached to a [`GuardrailResult`].
///
/// Serialized untagged: either the classification object or
/// `{"error": "guardrail_failed"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputInfo {
    /// The classifier produced a valid output.
    Classified(GuardrailOutput),
    /// The pipeline failed; the guardrail did not run.
    Failed {
        /// Generic failure marker.
        error: String,
    },
}

/// The decision returned by the moderation guardrail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailResult {
    /// Whether the output should be suppressed.
    pub tripwire_triggered: bool,

    /// The classification, or the failure marker.
    pub output_info: OutputInfo,
}

impl GuardrailResult {
    /// Result for a validated classification.
    #[must_use]
    pub fn classified(output: GuardrailOutput) -> Self {
        Self {
            tripwire_triggered: output.moderation_category.trips(),
            output_info: OutputInfo::Classified(output),
        }
    }

    /// Fail-open result: not triggered, generic error marker.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            tripwire_triggered: false,
            output_info: OutputInfo::Failed {
                error: GUARDRAIL_FAILED.to_owned(),
            },
        }
    }

    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.tripwire_triggered
    }

    /// Returns `true` if classification failed and the check was skipped.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.output_info, OutputInfo::Failed { .. })
    }

    /// The validated classification, if there is one.
    #[must_use]
    pub const fn output(&self) -> Option<&GuardrailOutput> {
        match &self.output_info {
            OutputInfo::Classified(output) => Some(output),
            OutputInfo::Failed { .. } => None,
        }
    }
}

impl From<GuardrailOutput> for GuardrailResult {
    fn from(output: GuardrailOutput) -> Self {
        Self::classified(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_names_round_trip_through_parse() {
        for category in ModerationCategory::ALL {
            assert_eq!(category.as_str().parse::<ModerationCategory>(), Ok(category));
        }
        assert!("offensive".parse::<ModerationCategory>().is_err());
    }

    #[test]
    fn test_only_none_does_not_trip() {
        assert!(ModerationCategory::Offensive.trips());
        assert!(ModerationCategory::OffBrand.trips());
        assert!(ModerationCategory::Violence.trips());
        assert!(!ModerationCategory::None.trips());
    }

    #[test]
    fn test_classified_result_json() {
        let result = GuardrailResult::classified(GuardrailOutput::new(
            ModerationCategory::OffBrand,
            "Disparages a competitor.",
        ));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "tripwireTriggered": true,
                "outputInfo": {
                    "moderationCategory": "OFF_BRAND",
                    "moderationRationale": "Disparages a competitor."
                }
            })
        );
    }

    #[test]
    fn test_failed_result_json() {
        let result = GuardrailResult::failed();
        assert!(!result.is_triggered());
        assert!(result.is_failed());
        assert!(result.output().is_none());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"tripwireTriggered": false, "outputInfo": {"error": "guardrail_failed"}})
        );
    }

    #[test]
    fn test_none_is_distinguishable_from_failure() {
        let safe = GuardrailResult::classified(GuardrailOutput::new(ModerationCategory::None, "Fine."));
        let failed = GuardrailResult::failed();
        assert_eq!(safe.is_triggered(), failed.is_triggered());
        assert_ne!(safe, failed);
        assert!(!safe.is_failed());
    }

    #[test]
    fn test_output_info_deserializes_both_shapes() {
        let failed: OutputInfo = serde_json::from_value(json!({"error": "guardrail_failed"})).unwrap();
        assert!(matches!(failed, OutputInfo::Failed { ref error } if error == GUARDRAIL_FAILED));

        let classified: OutputInfo = serde_json::from_value(
            json!({"moderationCategory": "NONE", "moderationRationale": "ok"}),
        )
        .unwrap();
        assert!(matches!(classified, OutputInfo::Classified(_)));
    }
}
