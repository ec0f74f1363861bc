use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_core::{Aggregate, AggregateId, AggregateRoot, DomainError, TenantId};
use restoflow_events::Event;

use crate::supplier::SupplierId;
use crate::transaction::{InventoryTransaction, StockDirection, TransactionId, TransactionType};
use crate::unit::UnitOfMeasure;

/// Ingredient identifier (one event stream per ingredient).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub AggregateId);

impl IngredientId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What to do when an outgoing movement would take stock below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStockPolicy {
    /// Record the movement anyway; the kitchen may be ahead of the counts.
    Allow,
    /// Refuse the movement.
    #[default]
    Reject,
    /// Record only what is on hand, leaving stock at exactly zero.
    ClampToZero,
}

/// Weighted-average unit cost after receiving `quantity` units at `unit_cost`.
///
/// When nothing positive is on hand the incoming cost becomes the average.
/// Returns `None` on decimal overflow.
pub fn weighted_average_cost(
    on_hand: Decimal,
    current_cost: Decimal,
    quantity: Decimal,
    unit_cost: Decimal,
) -> Option<Decimal> {
    if on_hand <= Decimal::ZERO {
        return Some(unit_cost);
    }
    let new_stock = on_hand.checked_add(quantity)?;
    if new_stock <= Decimal::ZERO {
        return Some(unit_cost);
    }
    let held = on_hand.checked_mul(current_cost)?;
    let incoming = quantity.checked_mul(unit_cost)?;
    held.checked_add(incoming)?.checked_div(new_stock)
}

/// Aggregate root: Ingredient (stock-keeping unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    id: IngredientId,
    tenant_id: Option<TenantId>,
    sku: String,
    name: String,
    category: String,
    unit: UnitOfMeasure,
    cost: Decimal,
    current_stock: Decimal,
    opening_stock: Decimal,
    min_stock: Decimal,
    max_stock: Decimal,
    supplier_id: Option<SupplierId>,
    last_updated: DateTime<Utc>,
    version: u64,
    created: bool,
}

impl Ingredient {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: IngredientId) -> Self {
        Self {
            id,
            tenant_id: None,
            sku: String::new(),
            name: String::new(),
            category: String::new(),
            unit: UnitOfMeasure::Unit,
            cost: Decimal::ZERO,
            current_stock: Decimal::ZERO,
            opening_stock: Decimal::ZERO,
            min_stock: Decimal::ZERO,
            max_stock: Decimal::ZERO,
            supplier_id: None,
            last_updated: DateTime::<Utc>::default(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> IngredientId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.unit
    }

    /// Weighted-average unit cost.
    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn current_stock(&self) -> Decimal {
        self.current_stock
    }

    /// Stock the ingredient was created with (not part of the kardex).
    pub fn opening_stock(&self) -> Decimal {
        self.opening_stock
    }

    pub fn min_stock(&self) -> Decimal {
        self.min_stock
    }

    pub fn max_stock(&self) -> Decimal {
        self.max_stock
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    /// `cost * current_stock`, saturating at the decimal bounds.
    pub fn stock_value(&self) -> Decimal {
        self.cost.saturating_mul(self.current_stock)
    }
}

impl AggregateRoot for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateIngredient.
///
/// `initial_stock` is an opening balance, not an audited movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIngredient {
    pub tenant_id: TenantId,
    pub ingredient_id: IngredientId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: UnitOfMeasure,
    pub initial_cost: Decimal,
    pub initial_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    pub supplier_id: Option<SupplierId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordTransaction.
///
/// `quantity` is a magnitude. `direction` is required for adjustments,
/// optional for transfers (defaults to outgoing) and must agree with the
/// type otherwise. `unit_cost` is required for purchases and refused for
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransaction {
    pub tenant_id: TenantId,
    pub ingredient_id: IngredientId,
    pub transaction_id: TransactionId,
    pub kind: TransactionType,
    pub quantity: Decimal,
    pub direction: Option<StockDirection>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub performed_by: String,
    pub negative_stock: NegativeStockPolicy,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientCommand {
    CreateIngredient(CreateIngredient),
    RecordTransaction(RecordTransaction),
}

/// Event: IngredientCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCreated {
    pub tenant_id: TenantId,
    pub ingredient_id: IngredientId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: UnitOfMeasure,
    pub initial_cost: Decimal,
    pub initial_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    pub supplier_id: Option<SupplierId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransactionRecorded.
///
/// Carries the kardex line and the weighted-average cost after it, so
/// replaying a stream never has to redo the cost arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecorded {
    pub tenant_id: TenantId,
    pub transaction: InventoryTransaction,
    pub cost_after: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientEvent {
    IngredientCreated(IngredientCreated),
    TransactionRecorded(TransactionRecorded),
}

impl IngredientEvent {
    pub fn ingredient_id(&self) -> IngredientId {
        match self {
            IngredientEvent::IngredientCreated(e) => e.ingredient_id,
            IngredientEvent::TransactionRecorded(e) => e.transaction.ingredient_id(),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        match self {
            IngredientEvent::IngredientCreated(e) => e.tenant_id,
            IngredientEvent::TransactionRecorded(e) => e.tenant_id,
        }
    }
}

impl Event for IngredientEvent {
    fn event_type(&self) -> &'static str {
        match self {
            IngredientEvent::IngredientCreated(_) => "inventory.ingredient.created",
            IngredientEvent::TransactionRecorded(_) => "inventory.ingredient.transaction_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            IngredientEvent::IngredientCreated(e) => e.occurred_at,
            IngredientEvent::TransactionRecorded(e) => e.transaction.date(),
        }
    }
}

impl Aggregate for Ingredient {
    type Command = IngredientCommand;
    type Event = IngredientEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            IngredientEvent::IngredientCreated(e) => {
                self.id = e.ingredient_id;
                self.tenant_id = Some(e.tenant_id);
                self.sku = e.sku.clone();
                self.name = e.name.clone();
                self.category = e.category.clone();
                self.unit = e.unit;
                self.cost = e.initial_cost;
                self.current_stock = e.initial_stock;
                self.opening_stock = e.initial_stock;
                self.min_stock = e.min_stock;
                self.max_stock = e.max_stock;
                self.supplier_id = e.supplier_id;
                self.last_updated = e.occurred_at;
                self.created = true;
            }
            IngredientEvent::TransactionRecorded(e) => {
                self.current_stock += e.transaction.quantity();
                self.cost = e.cost_after;
                self.last_updated = e.transaction.date();
            }
        }

        // +1 per applied event, so the version is the stream revision.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            IngredientCommand::CreateIngredient(cmd) => self.handle_create(cmd),
            IngredientCommand::RecordTransaction(cmd) => self.handle_record(cmd),
        }
    }
}

impl Ingredient {
    fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        Ok(())
    }

    fn ensure_ingredient_id(&self, ingredient_id: IngredientId) -> Result<(), DomainError> {
        if self.id != ingredient_id {
            return Err(DomainError::invariant("ingredient_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateIngredient) -> Result<Vec<IngredientEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict(format!(
                "ingredient {} already exists",
                cmd.ingredient_id
            )));
        }

        let sku = cmd.sku.trim();
        if sku.is_empty() {
            return Err(DomainError::invalid("sku cannot be empty"));
        }
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("name cannot be empty"));
        }
        if cmd.initial_cost.is_sign_negative() {
            return Err(DomainError::invalid("initial cost cannot be negative"));
        }
        if cmd.initial_stock.is_sign_negative() {
            return Err(DomainError::invalid("opening stock cannot be negative"));
        }
        if cmd.min_stock.is_sign_negative() {
            return Err(DomainError::invalid("minimum stock cannot be negative"));
        }
        if cmd.max_stock < cmd.min_stock {
            return Err(DomainError::invalid(format!(
                "maximum stock {} is below minimum stock {}",
                cmd.max_stock, cmd.min_stock
            )));
        }

        let category = match cmd.category.trim() {
            "" => "General".to_string(),
            c => c.to_string(),
        };

        Ok(vec![IngredientEvent::IngredientCreated(IngredientCreated {
            tenant_id: cmd.tenant_id,
            ingredient_id: cmd.ingredient_id,
            sku: sku.to_string(),
            name: name.to_string(),
            category,
            unit: cmd.unit,
            initial_cost: cmd.initial_cost,
            initial_stock: cmd.initial_stock,
            min_stock: cmd.min_stock,
            max_stock: cmd.max_stock,
            supplier_id: cmd.supplier_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record(&self, cmd: &RecordTransaction) -> Result<Vec<IngredientEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("ingredient {}", cmd.ingredient_id)));
        }
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_ingredient_id(cmd.ingredient_id)?;

        if cmd.quantity <= Decimal::ZERO {
            return Err(DomainError::invalid(format!(
                "{} quantity must be greater than zero (got {})",
                cmd.kind, cmd.quantity
            )));
        }

        let performed_by = cmd.performed_by.trim();
        if performed_by.is_empty() {
            return Err(DomainError::invalid("performed_by cannot be empty"));
        }

        let direction = resolve_direction(cmd.kind, cmd.direction)?;

        let (unit_cost, cost_after) = match cmd.kind {
            TransactionType::Purchase => {
                let unit_cost = cmd
                    .unit_cost
                    .ok_or_else(|| DomainError::invalid("purchase requires a unit cost"))?;
                if unit_cost.is_sign_negative() {
                    return Err(DomainError::invalid("purchase unit cost cannot be negative"));
                }
                let averaged =
                    weighted_average_cost(self.current_stock, self.cost, cmd.quantity, unit_cost)
                        .ok_or_else(|| DomainError::invalid("purchase amount out of range"))?;
                (unit_cost, averaged)
            }
            other => {
                if cmd.unit_cost.is_some() {
                    return Err(DomainError::invalid(format!(
                        "{other} is valued at the current average cost; unit cost override not allowed"
                    )));
                }
                (self.cost, self.cost)
            }
        };

        let mut quantity = direction.signed(cmd.quantity);
        let new_stock = self
            .current_stock
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invalid("quantity out of range"))?;
        if direction == StockDirection::Out && new_stock < Decimal::ZERO {
            match cmd.negative_stock {
                NegativeStockPolicy::Allow => {}
                NegativeStockPolicy::Reject => {
                    return Err(DomainError::invariant(format!(
                        "stock for {} cannot go negative (on hand {}, requested {})",
                        self.sku, self.current_stock, cmd.quantity
                    )));
                }
                NegativeStockPolicy::ClampToZero => {
                    if self.current_stock <= Decimal::ZERO {
                        return Err(DomainError::invalid(format!(
                            "no stock of {} on hand to remove",
                            self.sku
                        )));
                    }
                    quantity = -self.current_stock;
                }
            }
        }

        if unit_cost.checked_mul(quantity.abs()).is_none() {
            return Err(DomainError::invalid("transaction value out of range"));
        }

        let notes = cmd
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let transaction = InventoryTransaction::new(
            cmd.transaction_id,
            cmd.ingredient_id,
            cmd.kind,
            quantity,
            unit_cost,
            cmd.occurred_at,
            performed_by.to_string(),
            notes,
        );

        Ok(vec![IngredientEvent::TransactionRecorded(TransactionRecorded {
            tenant_id: cmd.tenant_id,
            transaction,
            cost_after,
        })])
    }
}

fn resolve_direction(
    kind: TransactionType,
    requested: Option<StockDirection>,
) -> Result<StockDirection, DomainError> {
    match (kind, requested) {
        (TransactionType::Purchase, None | Some(StockDirection::In)) => Ok(StockDirection::In),
        (TransactionType::Sale | TransactionType::Waste, None | Some(StockDirection::Out)) => {
            Ok(StockDirection::Out)
        }
        (TransactionType::Transfer, None) => Ok(StockDirection::Out),
        (TransactionType::Transfer | TransactionType::Adjustment, Some(d)) => Ok(d),
        (TransactionType::Adjustment, None) => Err(DomainError::invalid(
            "adjustment requires an explicit direction",
        )),
        (kind, Some(d)) => Err(DomainError::invalid(format!(
            "{kind} cannot move stock {}",
            match d {
                StockDirection::In => "in",
                StockDirection::Out => "out",
            }
        ))),
    }
}
