//! Strict validation of a candidate value against [`GuardrailOutput`].

use serde_json::Value;

use crate::error::ValidationError;

use super::GuardrailOutput;

/// Validate `candidate` as a [`GuardrailOutput`].
///
/// Nothing is coerced: the category must be one of the four known strings
/// and the rationale must be a string. Extra keys are ignored.
///
/// # Errors
///
/// Returns a [`ValidationError`] carrying the JSON path of the first
/// offending field.
pub fn validate(candidate: Value) -> Result<GuardrailOutput, ValidationError> {
    serde_path_to_error::deserialize(candidate).map_err(|err| {
        let path = err.path().to_string();
        ValidationError::new(path, err.into_inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::ModerationCategory;
    use serde_json::json;

    #[test]
    fn test_valid_output() {
        let output = validate(json!({
            "moderationCategory": "VIOLENCE",
            "moderationRationale": "Threatens harm."
        }))
        .unwrap();
        assert_eq!(output.moderation_category, ModerationCategory::Violence);
        assert_eq!(output.moderation_rationale, "Threatens harm.");
    }

    #[test]
    fn test_extra_keys_ignored() {
        let output = validate(json!({
            "moderationCategory": "NONE",
            "moderationRationale": "Fine.",
            "confidence": 0.9
        }))
        .unwrap();
        assert_eq!(output.moderation_category, ModerationCategory::None);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = validate(json!({
            "moderationCategory": "UNKNOWN_CATEGORY",
            "moderationRationale": "?"
        }))
        .unwrap_err();
        assert_eq!(err.path, "moderationCategory");
        assert!(err.message.contains("UNKNOWN_CATEGORY"));
    }

    #[test]
    fn test_lowercase_category_rejected() {
        assert!(validate(json!({"moderationCategory": "none", "moderationRationale": ""})).is_err());
    }

    #[test]
    fn test_non_string_category_rejected() {
        for category in [json!(1), json!(null), json!({"NONE": null}), json!(["NONE"])] {
            let result = validate(json!({
                "moderationCategory": category,
                "moderationRationale": "x"
            }));
            assert!(result.is_err(), "accepted {category}");
        }
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = validate(json!({"moderationRationale": "x"})).unwrap_err();
        assert!(err.message.contains("moderationCategory"));

        let err = validate(json!({"moderationCategory": "NONE"})).unwrap_err();
        assert!(err.message.contains("moderationRationale"));
    }

    #[test]
    fn test_non_string_rationale_rejected() {
        let err = validate(json!({"moderationCategory": "NONE", "moderationRationale": 42}))
            .unwrap_err();
        assert_eq!(err.path, "moderationRationale");
    }

    #[test]
    fn test_non_object_candidate_rejected() {
        for candidate in [json!("NONE"), json!(null), json!([]), json!(3)] {
            assert!(validate(candidate).is_err());
        }
    }
}
