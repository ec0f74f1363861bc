use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tracing::debug;

use crate::error::AiError;
use crate::generator::{GenerationRequest, TextGenerator};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for [`HttpTextGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking client for a `generateContent` style endpoint.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    client: reqwest::blocking::Client,
    settings: AiSettings,
}

impl HttpTextGenerator {
    pub fn new(settings: AiSettings) -> Result<Self, AiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AiError::Service(e.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let api_key = self
            .api_key()
            .ok_or_else(|| AiError::NotConfigured("no API key set".to_string()))?;

        debug!(model = %self.settings.model, "calling text generation service");

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()
            .map_err(|e| AiError::Service(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AiError::Service(format!("HTTP {}: {body}", status.as_u16())));
        }

        let body: JsonValue = resp
            .json()
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        extract_text(&body)
    }
}

/// Wire body for one request.
pub fn request_body(request: &GenerationRequest) -> JsonValue {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": request.prompt }] }],
    });
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(body: &JsonValue) -> Result<String, AiError> {
    let parsed: GenerateResponse = serde_json::from_value(body.clone())
        .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::MalformedResponse("response contained no text".to_string()));
    }
    Ok(text)
}
