//! Conservation invariant checker.
//!
//! Settlement only moves value between two companies; it never creates or
//! destroys it. The checker records the totals seeded at registration and
//! verifies that ledger-wide sums still match:
//!
//! ```text
//! Σ cash   == Σ(registration cash seeds)
//! Σ carbon == Σ(registration carbon seeds)
//! ```
//!
//! If this ever fails, a transfer leg was applied without its counterpart —
//! the one bug this engine exists to make impossible.

use carbonclear_types::{CarbonclearError, Result};
use rust_decimal::Decimal;

/// Tracks expected ledger-wide totals and verifies them after settlement.
#[derive(Debug, Default)]
pub struct ConservationCheck {
    expected_cash: Decimal,
    expected_carbon: Decimal,
}

impl ConservationCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registration seed.
    pub fn record_seed(&mut self, cash: Decimal, carbon: Decimal) {
        self.expected_cash += cash;
        self.expected_carbon += carbon;
    }

    #[must_use]
    pub fn expected_cash(&self) -> Decimal {
        self.expected_cash
    }

    #[must_use]
    pub fn expected_carbon(&self) -> Decimal {
        self.expected_carbon
    }

    /// Verify actual ledger-wide sums against the recorded seeds.
    ///
    /// # Errors
    /// [`CarbonclearError::ConservationViolation`] naming the divergent
    /// asset and amounts.
    pub fn verify(&self, actual_cash: Decimal, actual_carbon: Decimal) -> Result<()> {
        if actual_cash != self.expected_cash {
            return Err(CarbonclearError::ConservationViolation {
                reason: format!(
                    "total cash {actual_cash} != expected {}",
                    self.expected_cash
                ),
            });
        }
        if actual_carbon != self.expected_carbon {
            return Err(CarbonclearError::ConservationViolation {
                reason: format!(
                    "total carbon {actual_carbon} != expected {}",
                    self.expected_carbon
                ),
            });
        }
        Ok(())
    }
}
