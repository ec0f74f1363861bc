use tracing::{info, warn};

use crate::error::AiError;
use crate::generator::TextGenerator;
use crate::job::AiJob;

/// Runs AI jobs against a text generator.
#[derive(Debug, Clone)]
pub struct Advisor<G> {
    generator: G,
}

impl<G: TextGenerator> Advisor<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run a job, surfacing any failure.
    pub fn try_run<J: AiJob>(&self, job: &J) -> Result<J::Output, AiError> {
        let request = job.request()?;
        let text = self.generator.generate(&request)?;
        job.parse(&text)
    }

    /// Run a job; on failure log it and return the job's placeholder.
    pub fn run<J: AiJob>(&self, job: &J) -> J::Output {
        match self.try_run(job) {
            Ok(output) => {
                info!(job = job.name(), "AI job completed");
                output
            }
            Err(error) => {
                warn!(job = job.name(), %error, "AI job failed, using placeholder");
                job.fallback(&error)
            }
        }
    }
}
