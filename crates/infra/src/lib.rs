//! Infrastructure layer: event store, command pipeline, read models,
//! configuration and the inventory ledger facade built on top of them.

pub mod command_dispatcher;
pub mod config;
pub mod event_store;
pub mod ledger;
pub mod projections;
pub mod seed;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use config::{AppConfig, ConfigError};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore};
pub use ledger::{InventoryLedger, LedgerError, NewIngredient, RecordedTransaction, TransactionRequest};
pub use seed::{SeedData, SeedError};

#[cfg(test)]
mod integration_tests;
