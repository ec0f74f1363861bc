use std::collections::HashMap;
use std::sync::RwLock;

use restoflow_core::{AggregateId, ExpectedVersion, TenantId};

use super::stream::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct StreamKey {
    tenant_id: TenantId,
    aggregate_id: AggregateId,
}

#[derive(Debug, Default)]
struct Log {
    /// Every committed event, in commit order.
    events: Vec<StoredEvent>,
    /// Positions in `events` per stream.
    streams: HashMap<StreamKey, Vec<usize>>,
}

impl Log {
    fn stream_version(&self, key: &StreamKey) -> u64 {
        self.streams
            .get(key)
            .and_then(|idx| idx.last())
            .map(|&i| self.events[i].sequence_number)
            .unwrap_or(0)
    }

    fn stream_type(&self, key: &StreamKey) -> Option<&str> {
        self.streams
            .get(key)
            .and_then(|idx| idx.first())
            .map(|&i| self.events[i].aggregate_type.as_str())
    }
}

/// Process-lifetime event store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    log: RwLock<Log>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed events across all streams.
    pub fn len(&self) -> usize {
        self.log.read().map(|l| l.events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        events: Vec<UncommittedEvent>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEvent>, EventStoreError> {
        let Some(first) = events.first() else {
            return Ok(Vec::new());
        };
        let key = StreamKey {
            tenant_id: first.tenant_id,
            aggregate_id: first.aggregate_id,
        };
        let aggregate_type = first.aggregate_type.clone();

        for (idx, e) in events.iter().enumerate() {
            if e.tenant_id != key.tenant_id {
                return Err(EventStoreError::TenantIsolation(format!(
                    "batch mixes tenants (index {idx})"
                )));
            }
            if e.aggregate_id != key.aggregate_id {
                return Err(EventStoreError::InvalidAppend(format!(
                    "batch mixes streams (index {idx})"
                )));
            }
            if e.aggregate_type != aggregate_type {
                return Err(EventStoreError::AggregateTypeMismatch(format!(
                    "batch mixes aggregate types (index {idx})"
                )));
            }
        }

        let mut log = self.log.write().map_err(|_| EventStoreError::Poisoned)?;

        let current = log.stream_version(&key);
        if !expected_version.matches(current) {
            return Err(EventStoreError::Concurrency(format!(
                "expected {expected_version:?}, stream {} is at {current}",
                key.aggregate_id
            )));
        }
        if let Some(existing) = log.stream_type(&key) {
            if existing != aggregate_type {
                return Err(EventStoreError::AggregateTypeMismatch(format!(
                    "stream holds '{existing}', got '{aggregate_type}'"
                )));
            }
        }

        let mut committed = Vec::with_capacity(events.len());
        for (offset, e) in events.into_iter().enumerate() {
            let stored = StoredEvent {
                event_id: e.event_id,
                tenant_id: e.tenant_id,
                aggregate_id: e.aggregate_id,
                aggregate_type: e.aggregate_type,
                sequence_number: current + 1 + offset as u64,
                event_type: e.event_type,
                event_version: e.event_version,
                occurred_at: e.occurred_at,
                payload: e.payload,
            };
            let position = log.events.len();
            log.events.push(stored.clone());
            log.streams.entry(key).or_default().push(position);
            committed.push(stored);
        }

        Ok(committed)
    }

    fn load_stream(
        &self,
        tenant_id: TenantId,
        aggregate_id: AggregateId,
    ) -> Result<Vec<StoredEvent>, EventStoreError> {
        let key = StreamKey {
            tenant_id,
            aggregate_id,
        };
        let log = self.log.read().map_err(|_| EventStoreError::Poisoned)?;
        Ok(log
            .streams
            .get(&key)
            .map(|idx| idx.iter().map(|&i| log.events[i].clone()).collect())
            .unwrap_or_default())
    }

    fn load_tenant(&self, tenant_id: TenantId) -> Result<Vec<StoredEvent>, EventStoreError> {
        let log = self.log.read().map_err(|_| EventStoreError::Poisoned)?;
        Ok(log
            .events
            .iter()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}
