//! Append-only event store.
//!
//! One stream per ingredient, keyed by `(tenant_id, aggregate_id)`. Streams
//! are only ever appended to; committed events are never rewritten.

pub mod in_memory;
pub mod stream;

pub use in_memory::InMemoryEventStore;
pub use stream::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};
