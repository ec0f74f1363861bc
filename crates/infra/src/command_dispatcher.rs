//! Command execution pipeline for event-sourced aggregates.
//!
//! ```text
//! command
//!   -> load stream (tenant scoped) and check it
//!   -> rehydrate aggregate by applying history
//!   -> handle (pure decision)
//!   -> append with ExpectedVersion::Exact(loaded revision)
//!   -> return typed envelopes for the read models
//! ```
//!
//! Read models are fed by the caller from the returned envelopes, in the
//! same call, so a command that returns `Ok` is already visible to queries.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use restoflow_core::{Aggregate, AggregateId, DomainError, ExpectedVersion, TenantId};
use restoflow_events::{Event, EventEnvelope};

use crate::event_store::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The aggregate refused the command.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Stream moved between load and append.
    #[error("optimistic concurrency failure: {0}")]
    Concurrency(String),

    #[error("tenant isolation violation: {0}")]
    TenantIsolation(String),

    /// Stored history could not be read back as the aggregate's events.
    #[error("failed to deserialize stored event: {0}")]
    Deserialize(String),

    #[error("event store failure: {0}")]
    Store(EventStoreError),
}

impl From<EventStoreError> for DispatchError {
    fn from(value: EventStoreError) -> Self {
        match value {
            EventStoreError::Concurrency(msg) => DispatchError::Concurrency(msg),
            EventStoreError::TenantIsolation(msg) => DispatchError::TenantIsolation(msg),
            EventStoreError::Serialization(msg) => DispatchError::Deserialize(msg),
            other => DispatchError::Store(other),
        }
    }
}

/// Runs commands against aggregates persisted in an [`EventStore`].
#[derive(Debug)]
pub struct CommandDispatcher<S> {
    store: S,
}

impl<S> CommandDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: EventStore> CommandDispatcher<S> {
    /// Rebuild an aggregate from its stream.
    pub fn load<A>(
        &self,
        tenant_id: TenantId,
        aggregate_id: AggregateId,
        make_aggregate: impl FnOnce(AggregateId) -> A,
    ) -> Result<A, DispatchError>
    where
        A: Aggregate,
        A::Event: DeserializeOwned,
    {
        let history = self.store.load_stream(tenant_id, aggregate_id)?;
        check_stream(tenant_id, aggregate_id, &history)?;

        let mut aggregate = make_aggregate(aggregate_id);
        for stored in &history {
            let ev: A::Event = serde_json::from_value(stored.payload.clone())
                .map_err(|e| DispatchError::Deserialize(e.to_string()))?;
            aggregate.apply(&ev);
        }
        debug!(%aggregate_id, events = history.len(), "rehydrated aggregate");
        Ok(aggregate)
    }

    /// Load, decide, append. Returns the committed events, typed.
    pub fn dispatch<A>(
        &self,
        tenant_id: TenantId,
        aggregate_id: AggregateId,
        aggregate_type: &str,
        command: &A::Command,
        make_aggregate: impl FnOnce(AggregateId) -> A,
    ) -> Result<Vec<EventEnvelope<A::Event>>, DispatchError>
    where
        A: Aggregate<Error = DomainError>,
        A::Event: Event + Serialize + DeserializeOwned,
    {
        let aggregate = self.load(tenant_id, aggregate_id, make_aggregate)?;
        let expected = ExpectedVersion::Exact(aggregate.version());

        let decided = aggregate.handle(command)?;
        if decided.is_empty() {
            return Ok(Vec::new());
        }

        let uncommitted = decided
            .iter()
            .map(|ev| UncommittedEvent::from_typed(tenant_id, aggregate_id, aggregate_type, ev))
            .collect::<Result<Vec<_>, _>>()?;

        let committed = self.store.append(uncommitted, expected)?;

        // The store assigned positions; pair them back with the typed events.
        Ok(committed
            .iter()
            .zip(decided)
            .map(|(stored, ev)| stored.to_envelope().with_payload(ev))
            .collect())
    }
}

fn check_stream(
    tenant_id: TenantId,
    aggregate_id: AggregateId,
    stream: &[StoredEvent],
) -> Result<(), DispatchError> {
    let mut last = 0u64;
    for (idx, e) in stream.iter().enumerate() {
        if e.tenant_id != tenant_id || e.aggregate_id != aggregate_id {
            return Err(DispatchError::TenantIsolation(format!(
                "loaded stream contains a foreign event at index {idx}"
            )));
        }
        if e.sequence_number != last + 1 {
            return Err(DispatchError::Store(EventStoreError::InvalidAppend(format!(
                "stream has a gap (after {last}, found {})",
                e.sequence_number
            ))));
        }
        last = e.sequence_number;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::InMemoryEventStore;
    use chrono::Utc;
    use restoflow_inventory::{
        CreateIngredient, Ingredient, IngredientCommand, IngredientId, INGREDIENT_AGGREGATE_TYPE,
        UnitOfMeasure,
    };
    use rust_decimal::Decimal;

    fn create(tenant_id: TenantId, id: IngredientId) -> IngredientCommand {
        IngredientCommand::CreateIngredient(CreateIngredient {
            tenant_id,
            ingredient_id: id,
            sku: "PAN-001".to_string(),
            name: "Brioche bun".to_string(),
            category: "Bakery".to_string(),
            unit: UnitOfMeasure::Unit,
            initial_cost: Decimal::from(1200),
            initial_stock: Decimal::from(45),
            min_stock: Decimal::from(24),
            max_stock: Decimal::from(100),
            supplier_id: None,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn dispatch_persists_and_returns_sequenced_envelopes() {
        let dispatcher = CommandDispatcher::new(InMemoryEventStore::new());
        let tenant_id = TenantId::new();
        let id = IngredientId::new(AggregateId::new());

        let envs = dispatcher
            .dispatch(tenant_id, id.0, INGREDIENT_AGGREGATE_TYPE, &create(tenant_id, id), |_| {
                Ingredient::empty(id)
            })
            .unwrap();
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0].sequence_number(), 1);

        let loaded: Ingredient = dispatcher.load(tenant_id, id.0, |_| Ingredient::empty(id)).unwrap();
        assert_eq!(loaded.sku(), "PAN-001");
        assert_eq!(restoflow_core::AggregateRoot::version(&loaded), 1);
    }

    #[test]
    fn domain_rejection_writes_nothing() {
        let dispatcher = CommandDispatcher::new(InMemoryEventStore::new());
        let tenant_id = TenantId::new();
        let id = IngredientId::new(AggregateId::new());
        let cmd = create(tenant_id, id);

        dispatcher
            .dispatch(tenant_id, id.0, INGREDIENT_AGGREGATE_TYPE, &cmd, |_| Ingredient::empty(id))
            .unwrap();
        let err = dispatcher
            .dispatch(tenant_id, id.0, INGREDIENT_AGGREGATE_TYPE, &cmd, |_| Ingredient::empty(id))
            .unwrap_err();

        assert!(matches!(err, DispatchError::Domain(DomainError::Conflict(_))));
        assert_eq!(dispatcher.store().len(), 1);
    }
}
