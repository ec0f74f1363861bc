use crate::error::AiError;
use crate::generator::GenerationRequest;

/// A single AI task: build a request, interpret the answer, or fall back.
pub trait AiJob {
    type Output;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Validate the input and build the prompt.
    fn request(&self) -> Result<GenerationRequest, AiError>;

    /// Turn the raw service text into the job's output.
    fn parse(&self, text: &str) -> Result<Self::Output, AiError>;

    /// Placeholder output shown when the job could not run.
    fn fallback(&self, error: &AiError) -> Self::Output;
}
