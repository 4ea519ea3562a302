//! Broadcast delivery records.
//!
//! A [`Delivery`] means "this receiver was offered this request". One is
//! created per eligible receiver when a request is posted, and it is
//! immutable except for the `overdue_alert_viewed` flag. Overdue-ness is
//! never stored: it is derived from the request's creation time on every
//! read, so repeated reads always agree with the clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{CompanyId, DeliveryId, OutstandingRequest, RequestId, RequestStatus};

/// Per-receiver record that a request was broadcast to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: DeliveryId,
    /// The request this delivery refers to. The authoritative status lives
    /// on the request; this is a reference, not a copy.
    pub request_id: RequestId,
    pub receiver: CompanyId,
    /// Whether the receiver has acknowledged the overdue alert.
    pub overdue_alert_viewed: bool,
}

impl Delivery {
    #[must_use]
    pub fn new(request_id: RequestId, receiver: CompanyId) -> Self {
        Self {
            id: DeliveryId::new(),
            request_id,
            receiver,
            overdue_alert_viewed: false,
        }
    }
}

/// Read view joining a delivery to its request, with overdue derived at
/// read time from `now`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedRequest {
    pub delivery_id: DeliveryId,
    pub request_id: RequestId,
    pub requester: CompanyId,
    pub kind: crate::RequestKind,
    pub reason: String,
    pub unit_price: rust_decimal::Decimal,
    pub quantity: rust_decimal::Decimal,
    pub created_at: DateTime<Utc>,
    pub status: RequestStatus,
    /// `now > created_at + grace`, recomputed per read.
    pub overdue: bool,
    pub overdue_alert_viewed: bool,
}

impl ReceivedRequest {
    /// Join a delivery to its request, deriving `overdue` from `now` and
    /// the grace period.
    #[must_use]
    pub fn join(
        delivery: &Delivery,
        request: &OutstandingRequest,
        now: DateTime<Utc>,
        grace: Duration,
    ) -> Self {
        Self {
            delivery_id: delivery.id,
            request_id: request.id,
            requester: request.requester,
            kind: request.kind,
            reason: request.reason.clone(),
            unit_price: request.unit_price,
            quantity: request.quantity,
            created_at: request.created_at,
            status: request.status,
            overdue: now > request.created_at + grace,
            overdue_alert_viewed: delivery.overdue_alert_viewed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestKind;
    use rust_decimal::Decimal;

    #[test]
    fn new_delivery_starts_unviewed() {
        let dl = Delivery::new(RequestId::new(), CompanyId::new());
        assert!(!dl.overdue_alert_viewed);
    }

    #[test]
    fn join_fresh_request_not_overdue() {
        let req = OutstandingRequest::dummy(RequestKind::Buy, Decimal::ONE, Decimal::ONE);
        let dl = Delivery::new(req.id, CompanyId::new());
        let view = ReceivedRequest::join(&dl, &req, Utc::now(), Duration::days(7));
        assert!(!view.overdue);
        assert_eq!(view.status, RequestStatus::Pending);
        assert_eq!(view.request_id, req.id);
    }

    #[test]
    fn join_old_request_is_overdue() {
        let mut req = OutstandingRequest::dummy(RequestKind::Sell, Decimal::ONE, Decimal::ONE);
        req.created_at = Utc::now() - Duration::days(8);
        let dl = Delivery::new(req.id, CompanyId::new());
        let view = ReceivedRequest::join(&dl, &req, Utc::now(), Duration::days(7));
        assert!(view.overdue);
    }

    #[test]
    fn overdue_boundary_is_strict() {
        // Exactly at the grace boundary: not yet overdue.
        let req = OutstandingRequest::dummy(RequestKind::Buy, Decimal::ONE, Decimal::ONE);
        let dl = Delivery::new(req.id, CompanyId::new());
        let boundary = req.created_at + Duration::days(7);
        let view = ReceivedRequest::join(&dl, &req, boundary, Duration::days(7));
        assert!(!view.overdue);
        let view = ReceivedRequest::join(
            &dl,
            &req,
            boundary + Duration::seconds(1),
            Duration::days(7),
        );
        assert!(view.overdue);
    }

    #[test]
    fn join_reflects_current_request_status() {
        let mut req = OutstandingRequest::dummy(RequestKind::Buy, Decimal::ONE, Decimal::ONE);
        let dl = Delivery::new(req.id, CompanyId::new());
        req.status = RequestStatus::Accepted;
        let view = ReceivedRequest::join(&dl, &req, Utc::now(), Duration::days(7));
        assert_eq!(view.status, RequestStatus::Accepted);
    }
}
