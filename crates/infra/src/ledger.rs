//! Inventory ledger service.
//!
//! Owns the event store for one restaurant and keeps the stock-levels and
//! kardex read models in step with it. Commands run synchronously and are
//! visible to queries as soon as they return.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use restoflow_catalog::Recipe;
use restoflow_core::{AggregateId, DomainError, TenantId};
use restoflow_events::{EventEnvelope, Projection};
use restoflow_finance::{ExpenseBook, ProfitAndLoss};
use restoflow_inventory::{
    CreateIngredient, INGREDIENT_AGGREGATE_TYPE, Ingredient, IngredientCommand, IngredientEvent,
    IngredientId, InventoryTransaction, NegativeStockPolicy, RecordTransaction, StockDirection,
    SupplierId, TransactionId, TransactionType, UnitOfMeasure,
};

use crate::command_dispatcher::{CommandDispatcher, DispatchError};
use crate::event_store::{EventStore, InMemoryEventStore};
use crate::projections::{KardexProjection, LedgerIter, StockLevelsProjection};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("duplicate SKU: {0}")]
    DuplicateSku(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(msg) => LedgerError::NotFound(msg),
            DomainError::InvalidArgument(msg) | DomainError::InvalidId(msg) => {
                LedgerError::InvalidArgument(msg)
            }
            DomainError::DuplicateSku(msg) => LedgerError::DuplicateSku(msg),
            DomainError::InvariantViolation(msg) => LedgerError::InvariantViolation(msg),
            DomainError::Conflict(msg) => LedgerError::Conflict(msg),
        }
    }
}

impl From<DispatchError> for LedgerError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Domain(e) => e.into(),
            DispatchError::Concurrency(msg) => LedgerError::Conflict(msg),
            other => LedgerError::Storage(other.to_string()),
        }
    }
}

/// Input for [`InventoryLedger::create_ingredient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: UnitOfMeasure,
    pub initial_cost: Decimal,
    /// Opening balance; not written to the kardex.
    pub initial_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    pub supplier_id: Option<SupplierId>,
}

/// Input for [`InventoryLedger::record_transaction`].
///
/// `quantity` is always a magnitude; the type (and, for adjustments and
/// transfers, `direction`) decides the sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub ingredient_id: IngredientId,
    pub kind: TransactionType,
    pub quantity: Decimal,
    pub direction: Option<StockDirection>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub performed_by: String,
    /// Business time; `None` means now.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl TransactionRequest {
    fn new(
        ingredient_id: IngredientId,
        kind: TransactionType,
        quantity: Decimal,
        performed_by: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_id,
            kind,
            quantity,
            direction: None,
            unit_cost: None,
            notes: None,
            performed_by: performed_by.into(),
            occurred_at: None,
        }
    }

    pub fn purchase(
        ingredient_id: IngredientId,
        quantity: Decimal,
        unit_cost: Decimal,
        performed_by: impl Into<String>,
    ) -> Self {
        let mut req = Self::new(ingredient_id, TransactionType::Purchase, quantity, performed_by);
        req.unit_cost = Some(unit_cost);
        req
    }

    pub fn sale(ingredient_id: IngredientId, quantity: Decimal, performed_by: impl Into<String>) -> Self {
        Self::new(ingredient_id, TransactionType::Sale, quantity, performed_by)
    }

    pub fn waste(ingredient_id: IngredientId, quantity: Decimal, performed_by: impl Into<String>) -> Self {
        Self::new(ingredient_id, TransactionType::Waste, quantity, performed_by)
    }

    pub fn adjustment(
        ingredient_id: IngredientId,
        quantity: Decimal,
        direction: StockDirection,
        performed_by: impl Into<String>,
    ) -> Self {
        let mut req = Self::new(ingredient_id, TransactionType::Adjustment, quantity, performed_by);
        req.direction = Some(direction);
        req
    }

    /// Outgoing unless marked with [`incoming`](Self::incoming).
    pub fn transfer(ingredient_id: IngredientId, quantity: Decimal, performed_by: impl Into<String>) -> Self {
        Self::new(ingredient_id, TransactionType::Transfer, quantity, performed_by)
    }

    pub fn incoming(mut self) -> Self {
        self.direction = Some(StockDirection::In);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}

/// What a successful `record_transaction` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    pub transaction: InventoryTransaction,
    /// Ingredient state right after the transaction.
    pub ingredient: Ingredient,
}

/// Inventory ledger for one restaurant.
#[derive(Debug)]
pub struct InventoryLedger<S = InMemoryEventStore> {
    tenant_id: TenantId,
    policy: NegativeStockPolicy,
    dispatcher: CommandDispatcher<S>,
    stock: StockLevelsProjection,
    kardex: KardexProjection,
}

impl InventoryLedger<InMemoryEventStore> {
    pub fn in_memory(tenant_id: TenantId, policy: NegativeStockPolicy) -> Self {
        Self::new(tenant_id, policy, InMemoryEventStore::new())
    }
}

impl<S: EventStore> InventoryLedger<S> {
    /// Build a ledger over `store`. Existing streams are not read until
    /// [`rebuild`](Self::rebuild) is called.
    pub fn new(tenant_id: TenantId, policy: NegativeStockPolicy, store: S) -> Self {
        Self {
            tenant_id,
            policy,
            dispatcher: CommandDispatcher::new(store),
            stock: StockLevelsProjection::new(tenant_id),
            kardex: KardexProjection::new(tenant_id),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn policy(&self) -> NegativeStockPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: NegativeStockPolicy) {
        self.policy = policy;
    }

    pub fn store(&self) -> &S {
        self.dispatcher.store()
    }

    pub fn create_ingredient(&mut self, input: NewIngredient) -> Result<Ingredient, LedgerError> {
        let sku = input.sku.trim();
        if let Some(existing) = self.stock.find_by_sku(sku) {
            return Err(DomainError::duplicate_sku(format!(
                "{sku} is already used by '{}'",
                existing.name()
            ))
            .into());
        }

        let id = IngredientId::new(AggregateId::new());
        let cmd = IngredientCommand::CreateIngredient(CreateIngredient {
            tenant_id: self.tenant_id,
            ingredient_id: id,
            sku: sku.to_string(),
            name: input.name,
            category: input.category,
            unit: input.unit,
            initial_cost: input.initial_cost,
            initial_stock: input.initial_stock,
            min_stock: input.min_stock,
            max_stock: input.max_stock,
            supplier_id: input.supplier_id,
            occurred_at: Utc::now(),
        });

        self.execute(id, &cmd)?;
        let created = self.snapshot(&id)?;
        info!(
            ingredient_id = %id,
            sku = created.sku(),
            opening_stock = %created.opening_stock(),
            "ingredient created"
        );
        Ok(created)
    }

    pub fn record_transaction(
        &mut self,
        request: TransactionRequest,
    ) -> Result<RecordedTransaction, LedgerError> {
        let id = request.ingredient_id;
        if !self.stock.contains(&id) {
            return Err(LedgerError::NotFound(format!("ingredient {id}")));
        }

        let cmd = IngredientCommand::RecordTransaction(RecordTransaction {
            tenant_id: self.tenant_id,
            ingredient_id: id,
            transaction_id: TransactionId::new(),
            kind: request.kind,
            quantity: request.quantity,
            direction: request.direction,
            unit_cost: request.unit_cost,
            notes: request.notes,
            performed_by: request.performed_by,
            negative_stock: self.policy,
            occurred_at: request.occurred_at.unwrap_or_else(Utc::now),
        });

        let committed = self.execute(id, &cmd)?;
        let transaction = committed
            .iter()
            .find_map(|env| match env.payload() {
                IngredientEvent::TransactionRecorded(e) => Some(e.transaction.clone()),
                IngredientEvent::IngredientCreated(_) => None,
            })
            .ok_or_else(|| LedgerError::Storage("no transaction was committed".to_string()))?;
        let ingredient = self.snapshot(&id)?;

        info!(
            ingredient_id = %id,
            kind = %transaction.kind(),
            quantity = %transaction.quantity(),
            unit_cost = %transaction.unit_cost(),
            stock = %ingredient.current_stock(),
            cost = %ingredient.cost(),
            "inventory transaction recorded"
        );
        if ingredient.current_stock() < Decimal::ZERO {
            warn!(
                ingredient_id = %id,
                sku = ingredient.sku(),
                stock = %ingredient.current_stock(),
                "stock is negative"
            );
        }

        Ok(RecordedTransaction {
            transaction,
            ingredient,
        })
    }

    /// One `Sale` per ingredient the recipe uses, scaled by `portions`.
    ///
    /// Every ingredient is checked (existence, and stock under the
    /// rejecting and clamping policies) before anything is recorded.
    pub fn consume_recipe(
        &mut self,
        recipe: &Recipe,
        portions: u32,
        performed_by: &str,
        notes: Option<&str>,
    ) -> Result<Vec<RecordedTransaction>, LedgerError> {
        if portions == 0 {
            return Err(LedgerError::InvalidArgument(
                "portions must be greater than zero".to_string(),
            ));
        }
        let needed = recipe.requirements(portions);

        for line in &needed {
            let ingredient = self.snapshot(&line.ingredient_id)?;
            let short = ingredient.current_stock() < line.quantity;
            match self.policy {
                NegativeStockPolicy::Reject if short => {
                    return Err(LedgerError::InvariantViolation(format!(
                        "not enough {} for {portions} portion(s): need {}, have {}",
                        ingredient.sku(),
                        line.quantity,
                        ingredient.current_stock()
                    )));
                }
                NegativeStockPolicy::ClampToZero if ingredient.current_stock() <= Decimal::ZERO => {
                    return Err(LedgerError::InvalidArgument(format!(
                        "no {} on hand",
                        ingredient.sku()
                    )));
                }
                _ => {}
            }
        }

        let mut recorded = Vec::with_capacity(needed.len());
        for line in needed {
            let mut request = TransactionRequest::sale(line.ingredient_id, line.quantity, performed_by);
            request.notes = notes.map(str::to_string);
            recorded.push(self.record_transaction(request)?);
        }
        Ok(recorded)
    }

    pub fn ingredient(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.stock.get(id)
    }

    /// All ingredients, ordered by SKU.
    pub fn ingredients(&self) -> Vec<&Ingredient> {
        self.stock.list()
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&Ingredient> {
        self.stock.find_by_sku(sku)
    }

    pub fn low_stock(&self) -> Vec<&Ingredient> {
        self.stock.low_stock()
    }

    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<&Ingredient> {
        self.stock.search(term, category)
    }

    pub fn categories(&self) -> Vec<String> {
        self.stock.categories()
    }

    /// Transactions of one ingredient, newest first.
    pub fn ledger(&self, id: &IngredientId) -> Result<LedgerIter<'_>, LedgerError> {
        if !self.stock.contains(id) {
            return Err(LedgerError::NotFound(format!("ingredient {id}")));
        }
        Ok(self.kardex.history(id))
    }

    /// Total inventory value, `sum(cost * current_stock)`.
    pub fn valuation(&self) -> Decimal {
        self.stock.valuation()
    }

    /// Money spent on stock: the value of every recorded purchase.
    pub fn purchases_total(&self) -> Decimal {
        self.kardex.total_value_of(TransactionType::Purchase)
    }

    /// Income statement for `income`, with purchases as cost of goods and
    /// `expenses` as operating costs.
    pub fn profit_and_loss(&self, income: Decimal, expenses: &ExpenseBook) -> ProfitAndLoss {
        ProfitAndLoss::compute(income, self.purchases_total(), expenses.total())
    }

    /// Opening balance plus every signed kardex quantity.
    pub fn replay_stock(&self, id: &IngredientId) -> Result<Decimal, LedgerError> {
        let opening = self
            .stock
            .get(id)
            .map(Ingredient::opening_stock)
            .ok_or_else(|| LedgerError::NotFound(format!("ingredient {id}")))?;
        Ok(opening + self.kardex.history(id).map(InventoryTransaction::quantity).sum::<Decimal>())
    }

    /// Drop both read models and refold them from the store.
    pub fn rebuild(&mut self) -> Result<(), LedgerError> {
        let stored = self
            .dispatcher
            .store()
            .load_tenant(self.tenant_id)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        let envelopes = stored
            .iter()
            .map(|e| e.to_typed::<IngredientEvent>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        self.stock.clear();
        self.kardex.clear();
        self.stock.apply_all(&envelopes);
        self.kardex.apply_all(&envelopes);
        info!(events = envelopes.len(), ingredients = self.stock.len(), "read models rebuilt");
        Ok(())
    }

    fn execute(
        &mut self,
        id: IngredientId,
        cmd: &IngredientCommand,
    ) -> Result<Vec<EventEnvelope<IngredientEvent>>, LedgerError> {
        let committed = self.dispatcher.dispatch(
            self.tenant_id,
            id.0,
            INGREDIENT_AGGREGATE_TYPE,
            cmd,
            |_| Ingredient::empty(id),
        )?;
        self.stock.apply_all(&committed);
        self.kardex.apply_all(&committed);
        Ok(committed)
    }

    fn snapshot(&self, id: &IngredientId) -> Result<Ingredient, LedgerError> {
        self.stock
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("ingredient {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn burger_patty() -> NewIngredient {
        NewIngredient {
            sku: "PRD-CAR-01".to_string(),
            name: "Burger patty (150g pack)".to_string(),
            category: "Production".to_string(),
            unit: UnitOfMeasure::Unit,
            initial_cost: dec!(5800),
            initial_stock: dec!(100),
            min_stock: dec!(20),
            max_stock: dec!(200),
            supplier_id: None,
        }
    }

    #[test]
    fn create_rejects_duplicate_sku_after_trimming() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        ledger.create_ingredient(burger_patty()).unwrap();

        let mut again = burger_patty();
        again.sku = "  PRD-CAR-01 ".to_string();
        let err = ledger.create_ingredient(again).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSku(_)));

        let mut other_case = burger_patty();
        other_case.sku = "prd-car-01".to_string();
        assert!(ledger.create_ingredient(other_case).is_ok());
    }

    #[test]
    fn opening_balance_is_not_a_transaction() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let patty = ledger.create_ingredient(burger_patty()).unwrap();

        assert_eq!(ledger.ledger(&patty.id_typed()).unwrap().count(), 0);
        assert_eq!(ledger.replay_stock(&patty.id_typed()).unwrap(), dec!(100));
        assert_eq!(ledger.valuation(), dec!(580000));
    }

    #[test]
    fn unknown_ingredient_is_not_found() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let ghost = IngredientId::new(AggregateId::new());

        let err = ledger
            .record_transaction(TransactionRequest::sale(ghost, dec!(1), "Admin"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert!(matches!(ledger.ledger(&ghost), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn rejected_transaction_leaves_state_untouched() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Reject);
        let patty = ledger.create_ingredient(burger_patty()).unwrap();
        let id = patty.id_typed();
        let events_before = ledger.store().len();

        let err = ledger
            .record_transaction(TransactionRequest::waste(id, dec!(101), "Admin"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation(_)));
        assert_eq!(ledger.ingredient(&id), Some(&patty));
        assert_eq!(ledger.store().len(), events_before);
        assert_eq!(ledger.ledger(&id).unwrap().count(), 0);
    }

    #[test]
    fn rebuild_reproduces_read_models() {
        let mut ledger = InventoryLedger::in_memory(TenantId::new(), NegativeStockPolicy::Allow);
        let id = ledger.create_ingredient(burger_patty()).unwrap().id_typed();
        ledger
            .record_transaction(TransactionRequest::purchase(id, dec!(50), dec!(6000), "Admin"))
            .unwrap();
        ledger
            .record_transaction(TransactionRequest::sale(id, dec!(160), "System"))
            .unwrap();

        let before = ledger.ingredient(&id).cloned();
        let history_before: Vec<_> = ledger.ledger(&id).unwrap().cloned().collect();

        ledger.rebuild().unwrap();

        assert_eq!(ledger.ingredient(&id).cloned(), before);
        let history_after: Vec<_> = ledger.ledger(&id).unwrap().cloned().collect();
        assert_eq!(history_after, history_before);
        assert_eq!(ledger.ingredient(&id).unwrap().current_stock(), dec!(-10));
    }
}
