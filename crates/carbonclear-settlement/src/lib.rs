//! # carbonclear-settlement
//!
//! The settlement core: request lifecycle, two-sided balance transfers,
//! broadcast fan-out, and overdue tracking, orchestrated by
//! [`SettlementEngine`].
//!
//! ## Architecture
//!
//! - **lifecycle**: create-input validation and the single-shot
//!   PENDING → terminal transition guard.
//! - **transfer**: the pure balance-transfer planner — all sufficiency
//!   checks happen before any mutation, so a failed plan provably
//!   changes nothing.
//! - **fanout**: replicates a new request into one delivery per eligible
//!   receiver and derives overdue status on read.
//! - **conservation**: ledger-wide cash/carbon conservation checker.
//! - **engine**: the public contract — create, list, decide, mark-viewed —
//!   with every mutation inside one ledger transaction.
//!
//! ## Decision flow
//!
//! ```text
//! decide(id, decider, ACCEPT)
//!   └─ transaction ──> request still PENDING?   (Conflict if not)
//!                      decider holds a delivery? (Forbidden if not)
//!                      plan_transfer(...)        (InsufficientFunds leaves PENDING)
//!                      apply both balances + flip status   (one atomic unit)
//! ```

pub mod conservation;
pub mod engine;
pub mod fanout;
pub mod lifecycle;
pub mod transfer;

pub use conservation::ConservationCheck;
pub use engine::SettlementEngine;
pub use transfer::TransferOutcome;
