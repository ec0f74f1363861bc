//! `restoflow-ai`
//!
//! Boundary to an external generative text service. Nothing here touches
//! inventory or sales state; jobs get plain inputs and return text or
//! structured insights.
//!
//! Every job has a placeholder output, and [`Advisor::run`] falls back to it
//! on any failure, so callers never handle AI errors themselves.

pub mod advisor;
pub mod assistant;
pub mod business_analysis;
pub mod error;
pub mod generator;
pub mod http;
pub mod job;
pub mod menu_description;

pub use advisor::Advisor;
pub use error::AiError;
pub use generator::{GenerationRequest, TextGenerator};
pub use http::{AiSettings, HttpTextGenerator};
pub use job::AiJob;
pub use assistant::AssistantJob;
pub use business_analysis::{BusinessAnalysisJob, BusinessInsights, DailyStat};
pub use menu_description::MenuDescriptionJob;
