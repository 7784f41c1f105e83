//! Extraction of the structured output from a provider response.
//!
//! Providers return the classification either pre-parsed under
//! `output_parsed`, or as a JSON string under `choices[0].message.content`.
//! [`ResponseShape::detect`] decides which one applies; the order is fixed
//! because a response may carry both.

use serde_json::Value;
use tracing::debug;

use crate::error::NormalizationError;

/// The recognized shapes of a raw provider response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// `output_parsed` holds the structured value.
    Parsed(&'a Value),
    /// `choices[0].message.content` holds the value as text (not yet checked).
    Text(&'a Value),
    /// Neither field is present.
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    /// Detect the shape of `raw`. `output_parsed` wins over message content;
    /// a `null` field counts as absent.
    #[must_use]
    pub fn detect(raw: &'a Value) -> Self {
        if let Some(parsed) = raw.get("output_parsed").filter(|v| !v.is_null()) {
            return Self::Parsed(parsed);
        }

        let content = raw
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .filter(|v| !v.is_null());

        content.map_or(Self::Unrecognized, Self::Text)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Parsed(_) => "output_parsed",
            Self::Text(_) => "message_content",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Extract the candidate value from a raw provider response.
///
/// # Errors
///
/// Returns a [`NormalizationError`] when the message content is not a string,
/// is blank, is not valid JSON, or when no known field is present.
pub fn normalize(raw: &Value) -> Result<Value, NormalizationError> {
    let shape = ResponseShape::detect(raw);
    debug!(shape = shape.label(), "Detected response shape");

    match shape {
        ResponseShape::Parsed(value) => Ok(value.clone()),
        ResponseShape::Text(content) => {
            let text = content.as_str().ok_or(NormalizationError::NotAString)?;
            if text.trim().is_empty() {
                return Err(NormalizationError::Empty);
            }
            serde_json::from_str(text).map_err(|e| NormalizationError::InvalidJson(e.to_string()))
        }
        ResponseShape::Unrecognized => {
            let mut keys: Vec<String> = raw
                .as_object()
                .map(|obj| obj.keys().cloned().collect())
                .unwrap_or_default();
            keys.sort();
            Err(NormalizationError::NoCandidate { keys })
        }
    }
}
