//! Inventory domain module (event-sourced).
//!
//! Ingredients carry a weighted-average unit cost and an on-hand quantity;
//! both only move through recorded transactions, which form the kardex
//! (append-only audit trail). Pure domain logic: no IO, no storage.

pub mod ingredient;
pub mod supplier;
pub mod transaction;
pub mod unit;

pub use ingredient::{
    CreateIngredient, Ingredient, IngredientCommand, IngredientCreated, IngredientEvent,
    IngredientId, NegativeStockPolicy, RecordTransaction, TransactionRecorded,
    weighted_average_cost,
};
pub use supplier::{Supplier, SupplierDirectory, SupplierId};
pub use transaction::{InventoryTransaction, StockDirection, TransactionId, TransactionType};
pub use unit::UnitOfMeasure;

/// Aggregate type tag used for ingredient streams in the event store.
pub const INGREDIENT_AGGREGATE_TYPE: &str = "inventory.ingredient";
