use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_catalog::{MenuCategory, MenuItem, MenuItemId};
use restoflow_core::{DomainError, Entity};

use crate::promotion::{Promotion, PromotionEvaluator, PromotionOutcome};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(uuid::Uuid);

restoflow_core::uuid_newtype!(OrderId, "OrderId");

/// One menu item on an order, priced at the time it was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl OrderLine {
    /// Line for an orderable menu item.
    pub fn for_item(item: &MenuItem, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::invalid("order quantity must be greater than zero"));
        }
        if !item.is_available {
            return Err(DomainError::invalid(format!("'{}' is not available", item.name)));
        }
        Ok(Self {
            menu_item_id: item.id,
            name: item.name.clone(),
            category: item.category,
            quantity,
            unit_price: item.price,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// `max(0, subtotal - discount)`.
    pub taxable: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub total: Decimal,
}

/// An open order. Holds at most one promotion; applying another replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
    promotion: Option<Promotion>,
}

impl Order {
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            promotion: None,
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn add_line(&mut self, line: OrderLine) -> Result<(), DomainError> {
        if line.quantity == 0 {
            return Err(DomainError::invalid("order quantity must be greater than zero"));
        }
        if line.unit_price.is_sign_negative() {
            return Err(DomainError::invalid("unit price cannot be negative"));
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    /// Attach `promotion` if it qualifies. A promotion that does not apply
    /// leaves the current one in place.
    pub fn apply_promotion(
        &mut self,
        promotion: &Promotion,
        evaluator: &PromotionEvaluator,
        weekday: chrono::Weekday,
    ) -> PromotionOutcome {
        let outcome = evaluator.evaluate_on(promotion, &self.lines, weekday);
        if outcome.is_applied() {
            self.promotion = Some(promotion.clone());
        }
        outcome
    }

    pub fn clear_promotion(&mut self) -> Option<Promotion> {
        self.promotion.take()
    }

    /// Discount of the attached promotion against the current lines.
    pub fn discount(&self, evaluator: &PromotionEvaluator) -> Decimal {
        self.promotion
            .as_ref()
            .map(|p| evaluator.evaluate(p, &self.lines).discount())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn suggested_tip(&self, tip_rate: Decimal) -> Decimal {
        self.subtotal() * tip_rate
    }

    pub fn totals(
        &self,
        evaluator: &PromotionEvaluator,
        tax_rate: Decimal,
        tip: Decimal,
    ) -> OrderTotals {
        let subtotal = self.subtotal();
        let discount = self.discount(evaluator);
        let taxable = (subtotal - discount).max(Decimal::ZERO);
        let tax = taxable * tax_rate;
        OrderTotals {
            subtotal,
            discount,
            taxable,
            tax,
            tip,
            total: taxable + tax + tip,
        }
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
