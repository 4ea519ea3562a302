//! The transaction boundary around the ledger state.
//!
//! A single `parking_lot::Mutex` serializes all mutations: one lock
//! acquisition covers an entire decision (status re-check, status flip,
//! both balance writes), so no caller can observe a state where the
//! status is ACCEPTED but balances are not yet updated, or vice versa.
//! Two receivers racing to accept the same request are ordered by the
//! lock; the second one re-reads the request, sees it is no longer
//! PENDING, and fails with Conflict.

use std::sync::Arc;

use carbonclear_types::Result;
use parking_lot::Mutex;

use crate::LedgerState;

/// Shared, thread-safe handle to the ledger. Cheap to clone.
#[derive(Clone, Default)]
pub struct LedgerStore {
    inner: Arc<Mutex<LedgerState>>,
}

impl LedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a mutating transaction. The closure holds the only reference
    /// to the state for its whole duration; an `Err` return must leave
    /// the state untouched, which every caller guarantees by doing all
    /// reads and checks before its first write.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut LedgerState) -> Result<T>) -> Result<T> {
        let mut state = self.inner.lock();
        f(&mut state)
    }

    /// Run a read-only closure against current state. Reads always see
    /// fully applied transactions, never an intermediate state.
    pub fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> T {
        let state = self.inner.lock();
        f(&state)
    }
}
