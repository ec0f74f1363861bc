use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ingredient::IngredientId;

/// Kardex entry identifier. UUIDv7, so ids sort in creation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(uuid::Uuid);

restoflow_core::uuid_newtype!(TransactionId, "TransactionId");

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Goods received from a supplier. Revises the weighted-average cost.
    Purchase,
    /// Consumption by a sold dish.
    Sale,
    /// Spoilage, breakage, spills.
    Waste,
    /// Physical count correction, either direction.
    Adjustment,
    /// Movement between storage locations.
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        TransactionType::Purchase,
        TransactionType::Sale,
        TransactionType::Waste,
        TransactionType::Adjustment,
        TransactionType::Transfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::Sale => "SALE",
            TransactionType::Waste => "WASTE",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign of a movement. Callers pass magnitudes; the direction picks the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    pub fn signed(self, magnitude: Decimal) -> Decimal {
        match self {
            StockDirection::In => magnitude,
            StockDirection::Out => -magnitude,
        }
    }
}

/// One immutable kardex line.
///
/// `quantity` is signed (positive = stock in). `unit_cost` is the cost the
/// movement was valued at: the incoming cost for purchases, the running
/// weighted average for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTransaction {
    id: TransactionId,
    ingredient_id: IngredientId,
    kind: TransactionType,
    quantity: Decimal,
    unit_cost: Decimal,
    total_value: Decimal,
    date: DateTime<Utc>,
    performed_by: String,
    notes: Option<String>,
}

impl InventoryTransaction {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: TransactionId,
        ingredient_id: IngredientId,
        kind: TransactionType,
        quantity: Decimal,
        unit_cost: Decimal,
        date: DateTime<Utc>,
        performed_by: String,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            ingredient_id,
            kind,
            quantity,
            unit_cost,
            total_value: unit_cost * quantity.abs(),
            date,
            performed_by,
            notes,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn ingredient_id(&self) -> IngredientId {
        self.ingredient_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    /// Signed quantity (positive = stock in).
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// `unit_cost * |quantity|`.
    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn performed_by(&self) -> &str {
        &self.performed_by
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn direction(&self) -> StockDirection {
        if self.quantity.is_sign_negative() {
            StockDirection::Out
        } else {
            StockDirection::In
        }
    }
}
