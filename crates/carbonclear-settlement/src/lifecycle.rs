//! Request lifecycle: creation validation and the transition guard.
//!
//! States: PENDING (initial) → ACCEPTED | REJECTED (terminal). A request
//! transitions exactly once and never reverts; a decision arriving after
//! the transition fails with Conflict instead of being re-applied.

use carbonclear_types::{
    CarbonclearError, CompanyId, Decision, OutstandingRequest, RequestId, RequestKind,
    RequestStatus, Result, constants,
};
use chrono::Utc;
use rust_decimal::Decimal;

/// Validate creation inputs and build a PENDING request.
///
/// # Errors
/// `CC_ERR_100`..`CC_ERR_102` for an empty reason, non-positive price, or
/// non-positive quantity. Nothing is persisted on failure.
pub fn new_request(
    requester: CompanyId,
    kind: RequestKind,
    reason: &str,
    unit_price: Decimal,
    quantity: Decimal,
) -> Result<OutstandingRequest> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CarbonclearError::InvalidRequest {
            reason: "a reason is required".to_string(),
        });
    }
    if reason.len() > constants::MAX_REASON_LEN {
        return Err(CarbonclearError::InvalidRequest {
            reason: format!("reason exceeds {} characters", constants::MAX_REASON_LEN),
        });
    }
    if unit_price <= Decimal::ZERO {
        return Err(CarbonclearError::NonPositiveUnitPrice(unit_price));
    }
    if quantity <= Decimal::ZERO {
        return Err(CarbonclearError::NonPositiveQuantity(quantity));
    }

    Ok(OutstandingRequest {
        id: RequestId::new(),
        requester,
        kind,
        reason: reason.to_string(),
        unit_price,
        quantity,
        created_at: Utc::now(),
        status: RequestStatus::Pending,
    })
}

/// The terminal status a decision would move a pending request to.
///
/// # Errors
/// [`CarbonclearError::AlreadyDecided`] if the request has left PENDING —
/// the expected outcome for the loser of a concurrent acceptance race.
pub fn transition(request: &OutstandingRequest, decision: Decision) -> Result<RequestStatus> {
    if !request.status.is_pending() {
        return Err(CarbonclearError::AlreadyDecided {
            id: request.id,
            status: request.status,
        });
    }
    Ok(match decision {
        Decision::Accept => RequestStatus::Accepted,
        Decision::Reject => RequestStatus::Rejected,
    })
}
