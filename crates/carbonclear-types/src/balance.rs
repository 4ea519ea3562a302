//! Account balance types.
//!
//! Every company has exactly one [`AccountBalance`] holding its cash and
//! carbon-credit positions. Both fields are `Decimal` so repeated transfers
//! never accumulate rounding drift, and both must stay non-negative at
//! every observable point — operations that would go negative are rejected,
//! never clamped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The cash and carbon-credit position of a single company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountBalance {
    /// Monetary units available for purchases.
    pub cash: Decimal,
    /// Carbon-credit units held.
    pub carbon: Decimal,
}

impl AccountBalance {
    /// Create a zero balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cash: Decimal::ZERO,
            carbon: Decimal::ZERO,
        }
    }

    /// Create a balance with explicit starting values.
    #[must_use]
    pub fn with_funds(cash: Decimal, carbon: Decimal) -> Self {
        Self { cash, carbon }
    }

    /// Whether both positions are non-negative.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.cash >= Decimal::ZERO && self.carbon >= Decimal::ZERO
    }

    /// Whether this balance holds nothing at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cash.is_zero() && self.carbon.is_zero()
    }
}

impl Default for AccountBalance {
    fn default() -> Self {
        Self::new()
    }
}
