use crate::error::AiError;
use crate::generator::GenerationRequest;
use crate::job::AiJob;

/// Short answer to a free-form management question.
#[derive(Debug, Clone)]
pub struct AssistantJob {
    question: String,
}

impl AssistantJob {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl AiJob for AssistantJob {
    type Output = String;

    fn name(&self) -> &'static str {
        "assistant"
    }

    fn request(&self) -> Result<GenerationRequest, AiError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(AiError::InvalidInput("question is empty".to_string()));
        }
        Ok(GenerationRequest::text(format!(
            "You are a veteran restaurant manager and hospitality expert. \
             Answer this question briefly: \"{question}\"."
        )))
    }

    fn parse(&self, text: &str) -> Result<String, AiError> {
        Ok(text.trim().to_string())
    }

    fn fallback(&self, error: &AiError) -> String {
        match error {
            AiError::NotConfigured(_) => "Assistant unavailable: API key not configured.",
            AiError::InvalidInput(_) => "Ask a question to get an answer.",
            _ => "Connection error, try again later.",
        }
        .to_string()
    }
}
