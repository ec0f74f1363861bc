use serde_json::Value as JsonValue;

use crate::error::AiError;

/// One prompt, optionally constrained to a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the service is asked for `application/json` matching it.
    pub response_schema: Option<JsonValue>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// A text generation backend.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AiError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        (**self).generate(request)
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        (**self).generate(request)
    }
}
