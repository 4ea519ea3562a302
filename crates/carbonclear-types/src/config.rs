//! Engine configuration.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable parameters for the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Days after creation before a pending request is flagged overdue.
    pub overdue_grace_days: i64,
    /// Cash balance seeded at registration.
    pub starting_cash: Decimal,
    /// Carbon-credit balance seeded at registration.
    pub starting_carbon: Decimal,
}

impl EngineConfig {
    /// The overdue grace period as a duration.
    #[must_use]
    pub fn overdue_grace(&self) -> Duration {
        Duration::days(self.overdue_grace_days)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overdue_grace_days: constants::DEFAULT_OVERDUE_GRACE_DAYS,
            starting_cash: constants::STARTING_CASH,
            starting_carbon: constants::STARTING_CARBON,
        }
    }
}
