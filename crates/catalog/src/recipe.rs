use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_core::DomainError;
use restoflow_inventory::IngredientId;

/// How much of one ingredient a single portion consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

/// Bill of materials for one portion of a dish.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RecipeLine>", into = "Vec<RecipeLine>")]
pub struct Recipe {
    lines: Vec<RecipeLine>,
}

impl Recipe {
    /// Build a recipe; every line must consume a positive quantity.
    pub fn new(lines: Vec<RecipeLine>) -> Result<Self, DomainError> {
        if let Some(bad) = lines.iter().find(|l| l.quantity <= Decimal::ZERO) {
            return Err(DomainError::invalid(format!(
                "recipe quantity for ingredient {} must be greater than zero",
                bad.ingredient_id
            )));
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[RecipeLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantities needed for `portions` servings, merged per ingredient.
    /// Saturates at the decimal bounds.
    pub fn requirements(&self, portions: u32) -> Vec<RecipeLine> {
        let factor = Decimal::from(portions);
        let mut merged: Vec<RecipeLine> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let needed = line.quantity.saturating_mul(factor);
            match merged.iter_mut().find(|m| m.ingredient_id == line.ingredient_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(needed),
                None => merged.push(RecipeLine {
                    ingredient_id: line.ingredient_id,
                    quantity: needed,
                }),
            }
        }
        merged
    }
}

impl TryFrom<Vec<RecipeLine>> for Recipe {
    type Error = DomainError;

    fn try_from(lines: Vec<RecipeLine>) -> Result<Self, Self::Error> {
        Self::new(lines)
    }
}

impl From<Recipe> for Vec<RecipeLine> {
    fn from(recipe: Recipe) -> Self {
        recipe.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restoflow_core::AggregateId;
    use rust_decimal_macros::dec;

    fn ingredient() -> IngredientId {
        IngredientId::new(AggregateId::new())
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let err = Recipe::new(vec![RecipeLine {
            ingredient_id: ingredient(),
            quantity: dec!(0),
        }])
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn requirements_scale_and_merge_repeated_ingredients() {
        let patty = ingredient();
        let cheese = ingredient();
        let recipe = Recipe::new(vec![
            RecipeLine { ingredient_id: patty, quantity: dec!(1) },
            RecipeLine { ingredient_id: cheese, quantity: dec!(2) },
            RecipeLine { ingredient_id: patty, quantity: dec!(0.5) },
        ])
        .unwrap();

        let needed = recipe.requirements(2);
        assert_eq!(needed.len(), 2);
        assert_eq!(needed[0], RecipeLine { ingredient_id: patty, quantity: dec!(3.0) });
        assert_eq!(needed[1], RecipeLine { ingredient_id: cheese, quantity: dec!(4) });
    }

    #[test]
    fn deserializing_applies_the_same_validation() {
        let good = Recipe::new(vec![RecipeLine { ingredient_id: ingredient(), quantity: dec!(2) }])
            .unwrap();
        let json = serde_json::to_string(&good).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(serde_json::from_str::<Recipe>(&json).unwrap(), good);

        let zero = json.replace("\"2\"", "\"0\"");
        assert!(serde_json::from_str::<Recipe>(&zero).is_err());
    }
}
