//! # carbonclear-ledger
//!
//! **Ledger Store**: the only shared mutable resource in the engine.
//! Holds companies, their account balances, outstanding requests, and
//! per-receiver delivery records, and provides the atomic
//! read-modify-write transaction boundary every mutation routes through.
//!
//! ## Architecture
//!
//! - [`LedgerState`]: the plain data — map-backed tables plus a receiver
//!   index, with check-then-mutate accessors.
//! - [`LedgerStore`]: a mutex-guarded wrapper exposing `transaction` and
//!   `read` closures. One lock acquisition covers an entire decision
//!   (PENDING re-check, status flip, both balance writes), which is the
//!   single-writer serialization point that makes concurrent acceptance
//!   race-free.
//!
//! Nothing outside a transaction ever caches balances or status; every
//! operation re-reads current state before acting.

pub mod state;
pub mod store;

pub use state::LedgerState;
pub use store::LedgerStore;
