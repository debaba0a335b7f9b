//! Item diff returned to the client after a mutating operation.

use serde::{Deserialize, Serialize};

use crate::types::ItemRecord;

/// Ordered record of item deltas produced by a single operation. The
/// transport layer forwards this to the client verbatim, so insertion order
/// must match the order the mutations were applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionLedger {
    /// Newly created item instances.
    pub new: Vec<ItemRecord>,
    /// Modified item instances (stack splits, merges).
    pub change: Vec<ItemRecord>,
    /// Removed item instances, by identity.
    pub del: Vec<ItemRecord>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self, items: impl IntoIterator<Item = ItemRecord>) {
        self.new.extend(items);
    }

    pub fn record_changed(&mut self, items: impl IntoIterator<Item = ItemRecord>) {
        self.change.extend(items);
    }

    pub fn record_removed(&mut self, items: impl IntoIterator<Item = ItemRecord>) {
        self.del.extend(items);
    }

    /// Fold another ledger into this one, preserving order.
    pub fn merge(&mut self, other: TransactionLedger) {
        self.new.extend(other.new);
        self.change.extend(other.change);
        self.del.extend(other.del);
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.change.is_empty() && self.del.is_empty()
    }
}
