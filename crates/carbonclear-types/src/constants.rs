//! System-wide constants for the CarbonClear settlement engine.

use rust_decimal::Decimal;

/// Days after creation before a pending request is flagged overdue.
pub const DEFAULT_OVERDUE_GRACE_DAYS: i64 = 7;

/// Cash balance seeded for every newly registered company.
pub const STARTING_CASH: Decimal = Decimal::from_parts(500_000, 0, 0, false, 0);

/// Carbon-credit balance seeded for every newly registered company.
pub const STARTING_CARBON: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Maximum length of a request reason.
pub const MAX_REASON_LEN: usize = 255;

/// Maximum length of a company name or email.
pub const MAX_NAME_LEN: usize = 120;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "CarbonClear";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_balances_match_registration_seed() {
        assert_eq!(STARTING_CASH, Decimal::new(500_000, 0));
        assert_eq!(STARTING_CARBON, Decimal::new(1000, 0));
    }
}
