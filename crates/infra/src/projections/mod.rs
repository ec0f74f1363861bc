//! Read models folded from committed ingredient events.
//!
//! Both are disposable: clearing one and replaying the tenant's streams
//! rebuilds the same state. Each keeps a per-stream cursor so an envelope
//! seen twice is applied once.

pub mod kardex;
pub mod stock_levels;

pub use kardex::{KardexProjection, LedgerIter};
pub use stock_levels::StockLevelsProjection;
