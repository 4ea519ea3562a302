//! Outstanding request types.
//!
//! An [`OutstandingRequest`] is a two-party point offer, not an order on a
//! book: it is broadcast to every other company and settles all-or-nothing
//! when one receiver accepts. Status transitions exactly once,
//! PENDING → {ACCEPTED, REJECTED}, and requests are never deleted (audit
//! trail).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CompanyId, RequestId};

/// Which direction the requester wants to trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RequestKind {
    /// Requester wants to buy credits from the accepting receiver.
    Buy,
    /// Requester wants to sell credits to the accepting receiver.
    Sell,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Whether the request can still be decided.
    #[must_use]
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// Whether the request has reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A receiver's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => write!(f, "ACCEPT"),
            Self::Reject => write!(f, "REJECT"),
        }
    }
}

/// A posted BUY/SELL offer awaiting a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingRequest {
    pub id: RequestId,
    pub requester: CompanyId,
    pub kind: RequestKind,
    /// Free-text motivation, non-empty after trimming.
    pub reason: String,
    /// Price per carbon-credit unit, strictly positive.
    pub unit_price: Decimal,
    /// Carbon-credit units offered or sought, strictly positive.
    pub quantity: Decimal,
    pub created_at: DateTime<Utc>,
    /// Authoritative status. Deliveries reference it, never cache it.
    pub status: RequestStatus,
}

impl OutstandingRequest {
    /// Total cash value of the offer (`unit_price * quantity`).
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl OutstandingRequest {
    pub fn dummy(kind: RequestKind, unit_price: Decimal, quantity: Decimal) -> Self {
        Self {
            id: RequestId::new(),
            requester: CompanyId::new(),
            kind,
            reason: "offsetting Q3 emissions".to_string(),
            unit_price,
            quantity,
            created_at: Utc::now(),
            status: RequestStatus::Pending,
        }
    }
}
