use crate::error::AiError;
use crate::generator::GenerationRequest;
use crate::job::AiJob;

/// One-sentence menu copy for a dish.
#[derive(Debug, Clone)]
pub struct MenuDescriptionJob {
    dish: String,
    ingredients: String,
}

impl MenuDescriptionJob {
    pub fn new(dish: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            dish: dish.into(),
            ingredients: ingredients.into(),
        }
    }
}

impl AiJob for MenuDescriptionJob {
    type Output = String;

    fn name(&self) -> &'static str {
        "menu_description"
    }

    fn request(&self) -> Result<GenerationRequest, AiError> {
        let dish = self.dish.trim();
        if dish.is_empty() {
            return Err(AiError::InvalidInput("dish name is empty".to_string()));
        }
        Ok(GenerationRequest::text(format!(
            "Write an appetising, professional description for a fine-dining restaurant menu.\n\
             Dish: {dish}\n\
             Key ingredients: {}\n\
             Keep it to one elegant, persuasive sentence of at most 25 words.",
            self.ingredients.trim()
        )))
    }

    fn parse(&self, text: &str) -> Result<String, AiError> {
        Ok(text.trim().to_string())
    }

    fn fallback(&self, error: &AiError) -> String {
        match error {
            AiError::NotConfigured(_) => "AI description unavailable: API key not configured.",
            AiError::InvalidInput(_) => "Add a dish name to generate a description.",
            _ => "Could not generate a description right now.",
        }
        .to_string()
    }
}
