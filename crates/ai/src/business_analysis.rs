use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AiError;
use crate::generator::GenerationRequest;
use crate::job::AiJob;

/// Most observations kept from one analysis.
pub const MAX_INSIGHTS: usize = 3;

/// Sales for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Day label, e.g. `Mon`.
    pub name: String,
    pub sales: Decimal,
    pub orders: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessInsights {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub strategy: String,
}

/// Weekly sales review: up to three insights and one strategy.
#[derive(Debug, Clone)]
pub struct BusinessAnalysisJob {
    stats: Vec<DailyStat>,
}

impl BusinessAnalysisJob {
    pub fn new(stats: Vec<DailyStat>) -> Self {
        Self { stats }
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "insights": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Key observations about the sales data (max 3)."
                },
                "strategy": {
                    "type": "STRING",
                    "description": "One actionable recommendation to improve next week."
                }
            },
            "required": ["insights", "strategy"]
        })
    }
}

impl AiJob for BusinessAnalysisJob {
    type Output = BusinessInsights;

    fn name(&self) -> &'static str {
        "business_analysis"
    }

    fn request(&self) -> Result<GenerationRequest, AiError> {
        if self.stats.is_empty() {
            return Err(AiError::InvalidInput("no sales data to analyse".to_string()));
        }
        let data = serde_json::to_string(&self.stats)
            .map_err(|e| AiError::InvalidInput(e.to_string()))?;
        Ok(GenerationRequest::json(
            format!(
                "Act as an expert restaurant consultant. Analyse this weekly sales data: {data}. \
                 Provide insights and a strategy."
            ),
            Self::schema(),
        ))
    }

    fn parse(&self, text: &str) -> Result<BusinessInsights, AiError> {
        let mut parsed: BusinessInsights = serde_json::from_str(text.trim())
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        parsed.insights.retain(|i| !i.trim().is_empty());
        parsed.insights.truncate(MAX_INSIGHTS);
        Ok(parsed)
    }

    fn fallback(&self, error: &AiError) -> BusinessInsights {
        match error {
            AiError::NotConfigured(_) => BusinessInsights {
                insights: vec!["AI API key missing".to_string()],
                strategy: "Configure an API key to receive advice.".to_string(),
            },
            AiError::InvalidInput(_) => BusinessInsights {
                insights: vec!["No sales data yet".to_string()],
                strategy: "Record some sales first.".to_string(),
            },
            _ => BusinessInsights {
                insights: vec!["Could not analyse the data".to_string()],
                strategy: "Try again later.".to_string(),
            },
        }
    }
}
