//! Current state of every ingredient, plus a SKU index.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use restoflow_core::{Aggregate, TenantId};
use restoflow_events::{EventEnvelope, Projection};
use restoflow_inventory::{Ingredient, IngredientEvent, IngredientId};

/// Ingredient snapshots folded from committed events.
///
/// Scoped to one tenant; envelopes from other tenants are ignored.
#[derive(Debug, Clone)]
pub struct StockLevelsProjection {
    tenant_id: TenantId,
    ingredients: HashMap<IngredientId, Ingredient>,
    by_sku: HashMap<String, IngredientId>,
    cursors: HashMap<IngredientId, u64>,
}

impl StockLevelsProjection {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            ingredients: HashMap::new(),
            by_sku: HashMap::new(),
            cursors: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ingredients.clear();
        self.by_sku.clear();
        self.cursors.clear();
    }

    pub fn get(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn contains(&self, id: &IngredientId) -> bool {
        self.ingredients.contains_key(id)
    }

    /// Exact, case-sensitive match on the trimmed SKU.
    pub fn find_by_sku(&self, sku: &str) -> Option<&Ingredient> {
        self.by_sku
            .get(sku.trim())
            .and_then(|id| self.ingredients.get(id))
    }

    /// All ingredients ordered by SKU.
    pub fn list(&self) -> Vec<&Ingredient> {
        let mut all: Vec<&Ingredient> = self.ingredients.values().collect();
        all.sort_by(|a, b| a.sku().cmp(b.sku()));
        all
    }

    pub fn low_stock(&self) -> Vec<&Ingredient> {
        self.list().into_iter().filter(|i| i.is_low_stock()).collect()
    }

    /// Case-insensitive match on name or SKU, optionally within one category.
    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<&Ingredient> {
        let term = term.trim().to_lowercase();
        self.list()
            .into_iter()
            .filter(|i| category.is_none_or(|c| i.category() == c))
            .filter(|i| {
                term.is_empty()
                    || i.name().to_lowercase().contains(&term)
                    || i.sku().to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.ingredients
            .values()
            .map(|i| i.category().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of `cost * current_stock`.
    pub fn valuation(&self) -> Decimal {
        self.ingredients
            .values()
            .map(Ingredient::stock_value)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl Projection for StockLevelsProjection {
    type Ev = IngredientEvent;

    fn apply(&mut self, envelope: &EventEnvelope<IngredientEvent>) {
        if envelope.tenant_id() != self.tenant_id {
            return;
        }
        let id = envelope.payload().ingredient_id();
        let seq = envelope.sequence_number();
        let cursor = self.cursors.entry(id).or_insert(0);
        if seq <= *cursor {
            return;
        }
        *cursor = seq;

        let ingredient = self
            .ingredients
            .entry(id)
            .or_insert_with(|| Ingredient::empty(id));
        ingredient.apply(envelope.payload());

        if let IngredientEvent::IngredientCreated(e) = envelope.payload() {
            self.by_sku.insert(e.sku.clone(), id);
        }
    }
}
