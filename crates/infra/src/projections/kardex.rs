//! Per-ingredient transaction history (the kardex).

use std::collections::HashMap;
use std::iter::Rev;
use std::slice;

use rust_decimal::Decimal;

use restoflow_core::TenantId;
use restoflow_events::{EventEnvelope, Projection};
use restoflow_inventory::{IngredientEvent, IngredientId, InventoryTransaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq)]
struct KardexEntry {
    sequence_number: u64,
    transaction: InventoryTransaction,
}

impl KardexEntry {
    fn sort_key(&self) -> (chrono::DateTime<chrono::Utc>, u64) {
        (self.transaction.date(), self.sequence_number)
    }
}

/// Transactions per ingredient, kept in `(date, recording order)` order.
#[derive(Debug, Clone)]
pub struct KardexProjection {
    tenant_id: TenantId,
    entries: HashMap<IngredientId, Vec<KardexEntry>>,
    cursors: HashMap<IngredientId, u64>,
}

impl KardexProjection {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            entries: HashMap::new(),
            cursors: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursors.clear();
    }

    /// Newest first; ties on date go to the later recording.
    pub fn history(&self, id: &IngredientId) -> LedgerIter<'_> {
        let entries = self.entries.get(id).map(Vec::as_slice).unwrap_or(&[]);
        LedgerIter {
            inner: entries.iter().rev(),
        }
    }

    /// Value of every transaction of `kind`, across all ingredients.
    pub fn total_value_of(&self, kind: TransactionType) -> Decimal {
        self.entries
            .values()
            .flatten()
            .filter(|e| e.transaction.kind() == kind)
            .map(|e| e.transaction.total_value())
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn len(&self, id: &IngredientId) -> usize {
        self.entries.get(id).map(Vec::len).unwrap_or(0)
    }
}

impl Projection for KardexProjection {
    type Ev = IngredientEvent;

    fn apply(&mut self, envelope: &EventEnvelope<IngredientEvent>) {
        if envelope.tenant_id() != self.tenant_id {
            return;
        }
        let IngredientEvent::TransactionRecorded(recorded) = envelope.payload() else {
            return;
        };
        let id = recorded.transaction.ingredient_id();
        let seq = envelope.sequence_number();
        let cursor = self.cursors.entry(id).or_insert(0);
        if seq <= *cursor {
            return;
        }
        *cursor = seq;

        let entry = KardexEntry {
            sequence_number: seq,
            transaction: recorded.transaction.clone(),
        };
        let list = self.entries.entry(id).or_default();
        let at = list.partition_point(|e| e.sort_key() <= entry.sort_key());
        list.insert(at, entry);
    }
}

/// Lazy, restartable walk over one ingredient's kardex, newest first.
#[derive(Debug, Clone)]
pub struct LedgerIter<'a> {
    inner: Rev<slice::Iter<'a, KardexEntry>>,
}

impl<'a> Iterator for LedgerIter<'a> {
    type Item = &'a InventoryTransaction;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &e.transaction)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for LedgerIter<'_> {}
