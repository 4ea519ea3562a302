//! # carbonclear-types
//!
//! Shared types, errors, and configuration for the **CarbonClear**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`CompanyId`], [`RequestId`], [`DeliveryId`]
//! - **Company model**: [`Company`]
//! - **Balance model**: [`AccountBalance`]
//! - **Request model**: [`OutstandingRequest`], [`RequestKind`], [`RequestStatus`], [`Decision`]
//! - **Delivery model**: [`Delivery`], [`ReceivedRequest`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`CarbonclearError`] with `CC_ERR_` prefix codes
//! - **Constants**: starting balances and the overdue grace period

pub mod balance;
pub mod company;
pub mod config;
pub mod constants;
pub mod delivery;
pub mod error;
pub mod ids;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use carbonclear_types::{OutstandingRequest, RequestKind, Decision, ...};

pub use balance::*;
pub use company::*;
pub use config::*;
pub use delivery::*;
pub use error::*;
pub use ids::*;
pub use request::*;

// Constants are accessed via `carbonclear_types::constants::FOO`
// (not re-exported to avoid name collisions).
