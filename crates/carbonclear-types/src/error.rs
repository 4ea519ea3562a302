//! Error types for the CarbonClear settlement engine.
//!
//! All errors use the `CC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Balance errors
//! - 3xx: Request lifecycle errors
//! - 4xx: Delivery errors
//! - 5xx: Company / registry errors
//! - 8xx: Invariant violations
//! - 9xx: General / internal errors
//!
//! Everything here is recoverable and reportable to the caller; nothing is
//! fatal to the process. Any failure path guarantees zero partial effect on
//! balances or status.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{CompanyId, DeliveryId, RequestId, RequestStatus};

/// Which side of a transfer lacked funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferParty {
    Requester,
    Receiver,
}

impl std::fmt::Display for TransferParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requester => write!(f, "requester"),
            Self::Receiver => write!(f, "receiver"),
        }
    }
}

/// Which asset a balance check applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Cash,
    Carbon,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Carbon => write!(f, "carbon"),
        }
    }
}

/// Central error enum for all CarbonClear operations.
#[derive(Debug, Error)]
pub enum CarbonclearError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// A request field failed validation (empty reason, bad enum, etc.).
    #[error("CC_ERR_100: Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Unit price must be strictly positive.
    #[error("CC_ERR_101: Unit price must be > 0, got {0}")]
    NonPositiveUnitPrice(Decimal),

    /// Quantity must be strictly positive.
    #[error("CC_ERR_102: Quantity must be > 0, got {0}")]
    NonPositiveQuantity(Decimal),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// A settlement leg would overdraw one party. The request stays
    /// PENDING so another receiver may still act.
    #[error(
        "CC_ERR_200: Insufficient {asset} balance for {party}: need {needed}, have {available}"
    )]
    InsufficientFunds {
        party: TransferParty,
        asset: AssetKind,
        needed: Decimal,
        available: Decimal,
    },

    /// No balance row exists for a registered company — registry corruption.
    #[error("CC_ERR_201: No account balance for company {0}")]
    BalanceNotFound(CompanyId),

    // =================================================================
    // Request Lifecycle Errors (3xx)
    // =================================================================
    /// The requested outstanding request does not exist.
    #[error("CC_ERR_300: Request not found: {0}")]
    RequestNotFound(RequestId),

    /// A decision arrived after the request left PENDING. Expected under
    /// concurrent acceptance; the earlier decision stands.
    #[error("CC_ERR_301: Request {id} already decided: {status}")]
    AlreadyDecided { id: RequestId, status: RequestStatus },

    // =================================================================
    // Delivery Errors (4xx)
    // =================================================================
    /// The delivery record does not exist.
    #[error("CC_ERR_400: Delivery not found: {0}")]
    DeliveryNotFound(DeliveryId),

    /// The caller is not the receiver the resource belongs to.
    #[error("CC_ERR_401: Company {caller} is not the receiver of this delivery")]
    NotReceiver { caller: CompanyId },

    /// The deciding company holds no delivery for the request — it was
    /// never offered to them.
    #[error("CC_ERR_402: Company {caller} was not offered request {request}")]
    NotOffered {
        caller: CompanyId,
        request: RequestId,
    },

    // =================================================================
    // Company / Registry Errors (5xx)
    // =================================================================
    /// Unknown company id.
    #[error("CC_ERR_500: Company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// A company with this name is already registered.
    #[error("CC_ERR_501: Company name already registered: {0}")]
    DuplicateName(String),

    /// A company with this email is already registered.
    #[error("CC_ERR_502: Email already registered: {0}")]
    DuplicateEmail(String),

    // =================================================================
    // Invariant Violations (8xx)
    // =================================================================
    /// Ledger-wide conservation check failed — critical safety alert.
    #[error("CC_ERR_800: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CC_ERR_900: Internal error: {0}")]
    Internal(String),

    /// I/O error (disk, network).
    #[error("CC_ERR_901: I/O error: {0}")]
    Io(String),
}

impl CarbonclearError {
    /// Whether this error is the expected loser of a concurrent-decision
    /// race (spec: Conflict), as opposed to a caller mistake.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyDecided { .. })
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CarbonclearError>;

// Conversion from std::io::Error
impl From<std::io::Error> for CarbonclearError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = CarbonclearError::RequestNotFound(RequestId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("CC_ERR_300"), "Got: {msg}");
    }

    #[test]
    fn insufficient_funds_display() {
        let err = CarbonclearError::InsufficientFunds {
            party: TransferParty::Receiver,
            asset: AssetKind::Cash,
            needed: Decimal::new(1000, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CC_ERR_200"));
        assert!(msg.contains("receiver"));
        assert!(msg.contains("cash"));
        assert!(msg.contains("1000"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn already_decided_is_conflict() {
        let err = CarbonclearError::AlreadyDecided {
            id: RequestId::new(),
            status: RequestStatus::Accepted,
        };
        assert!(err.is_conflict());
        assert!(format!("{err}").contains("ACCEPTED"));
    }

    #[test]
    fn non_conflict_errors() {
        assert!(!CarbonclearError::RequestNotFound(RequestId::new()).is_conflict());
        assert!(
            !CarbonclearError::InvalidRequest {
                reason: "x".into()
            }
            .is_conflict()
        );
    }

    #[test]
    fn all_errors_have_cc_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CarbonclearError::InvalidRequest {
                reason: "test".into(),
            }),
            Box::new(CarbonclearError::NonPositiveQuantity(Decimal::ZERO)),
            Box::new(CarbonclearError::BalanceNotFound(CompanyId::new())),
            Box::new(CarbonclearError::DeliveryNotFound(DeliveryId::new())),
            Box::new(CarbonclearError::DuplicateName("Acme".into())),
            Box::new(CarbonclearError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CC_ERR_"),
                "Error missing CC_ERR_ prefix: {msg}"
            );
        }
    }
}
