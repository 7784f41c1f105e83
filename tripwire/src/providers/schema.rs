//! Structured-output schema sent along with a classification request.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

use crate::guardrail::GuardrailOutput;

/// A named JSON schema the provider's output must conform to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescriptor {
    /// Schema name reported to the provider.
    pub name: String,
    /// The JSON schema itself.
    pub schema: Value,
    /// Whether the provider should enforce the schema strictly.
    pub strict: bool,
}

impl SchemaDescriptor {
    /// Name under which the guardrail output schema is sent.
    pub const GUARDRAIL_OUTPUT_NAME: &'static str = "output_format";

    /// Build a strict descriptor for any `JsonSchema` type.
    ///
    /// The root object gets `additionalProperties: false` and loses its
    /// `$schema` keyword, which strict structured output does not accept.
    #[must_use]
    pub fn for_type<T: JsonSchema>(name: impl Into<String>) -> Self {
        let mut schema = schemars::schema_for!(T);
        schema.remove("$schema");
        schema.insert("additionalProperties".to_owned(), Value::Bool(false));

        Self {
            name: name.into(),
            schema: schema.to_value(),
            strict: true,
        }
    }

    /// Descriptor for [`GuardrailOutput`].
    #[must_use]
    pub fn guardrail_output() -> Self {
        Self::for_type::<GuardrailOutput>(Self::GUARDRAIL_OUTPUT_NAME)
    }

    /// Responses-style format object: `{type, name, schema, strict}`.
    #[must_use]
    pub fn text_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "name": self.name,
            "schema": self.schema,
            "strict": self.strict,
        })
    }

    /// Chat Completions `response_format` object.
    #[must_use]
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema,
                "strict": self.strict,
            }
        })
    }
}
