//! Usage ledger
//!
//! Append-only record of billable usage. Appends go to a lock-free queue and are folded
//! into the committed log when a reader needs a consistent view.

use super::types::UsageLedgerEntry;
use crossbeam_queue::SegQueue;
use parking_lot::RwLock;
use std::fmt::Debug;

/// Storage for ledger entries
///
/// Implementations must never drop or reorder an appended entry.
pub trait UsageLedger: Send + Sync + Debug {
    /// Append one entry
    fn append(&self, entry: UsageLedgerEntry);

    /// All entries in append order
    fn entries(&self) -> Vec<UsageLedgerEntry>;

    /// Sum of estimated cost over entries matching `filter`
    fn sum_cost(&self, filter: &dyn Fn(&UsageLedgerEntry) -> bool) -> f64 {
        self.entries()
            .iter()
            .filter(|e| filter(e))
            .map(|e| e.estimated_cost)
            .sum()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process ledger
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    pending: SegQueue<UsageLedgerEntry>,
    committed: RwLock<Vec<UsageLedgerEntry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move pending appends into the committed log
    fn compact(&self) {
        if self.pending.is_empty() {
            return;
        }
        let mut committed = self.committed.write();
        while let Some(entry) = self.pending.pop() {
            committed.push(entry);
        }
    }
}

impl UsageLedger for InMemoryLedger {
    fn append(&self, entry: UsageLedgerEntry) {
        self.pending.push(entry);
    }

    fn entries(&self) -> Vec<UsageLedgerEntry> {
        self.compact();
        self.committed.read().clone()
    }

    fn sum_cost(&self, filter: &dyn Fn(&UsageLedgerEntry) -> bool) -> f64 {
        self.compact();
        self.committed
            .read()
            .iter()
            .filter(|e| filter(e))
            .map(|e| e.estimated_cost)
            .sum()
    }

    fn len(&self) -> usize {
        self.compact();
        self.committed.read().len()
    }
}
