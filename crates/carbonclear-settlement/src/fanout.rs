//! Broadcast fan-out.
//!
//! A newly created request is replicated into one [`Delivery`] per company
//! registered at creation time, excluding the requester. The snapshot is
//! taken once: companies registered afterward do not retroactively receive
//! the request. Fan-out is O(n) writes per request, which is fine at this
//! marketplace's scale; a large registry would call for targeted matching
//! instead of broadcast-to-all.

use carbonclear_types::{CompanyId, Delivery, RequestId};
use chrono::{DateTime, Duration, Utc};

/// Build one delivery per eligible receiver.
#[must_use]
pub fn fan_out(request_id: RequestId, receivers: &[CompanyId]) -> Vec<Delivery> {
    receivers
        .iter()
        .map(|&receiver| Delivery::new(request_id, receiver))
        .collect()
}

/// Whether a request is overdue at `now`. Derived, never persisted.
#[must_use]
pub fn is_overdue(created_at: DateTime<Utc>, now: DateTime<Utc>, grace: Duration) -> bool {
    now > created_at + grace
}
