//! The settlement engine — the public contract.
//!
//! Every mutating operation runs as one [`LedgerStore`] transaction, so
//! the PENDING re-check, the status flip, and both balance writes of an
//! acceptance are a single atomic unit. Two receivers racing to accept the
//! same request are serialized by the store; exactly one wins, the other
//! observes `AlreadyDecided`.
//!
//! Reads (`list_own_requests`, `list_received_requests`, `balances`) always
//! re-read current state; overdue status is derived per call and never
//! persisted.

use carbonclear_types::{
    AccountBalance, CarbonclearError, CompanyId, Decision, DeliveryId, EngineConfig,
    OutstandingRequest, ReceivedRequest, RequestId, RequestKind, RequestStatus, Result,
};
use carbonclear_ledger::LedgerStore;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::conservation::ConservationCheck;
use crate::{fanout, lifecycle, transfer};

/// Orchestrates request creation, broadcast fan-out, and decisions over a
/// shared ledger. Cheap to share behind an `Arc`; all methods take `&self`.
pub struct SettlementEngine {
    store: LedgerStore,
    config: EngineConfig,
    // Locked before the store whenever both are needed, so verification
    // never observes a seed without its balance row or vice versa.
    conservation: Mutex<ConservationCheck>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: LedgerStore::new(),
            config,
            conservation: Mutex::new(ConservationCheck::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a company and seed its starting balance.
    pub fn register_company(&self, name: &str, email: &str) -> Result<CompanyId> {
        let starting =
            AccountBalance::with_funds(self.config.starting_cash, self.config.starting_carbon);
        let mut conservation = self.conservation.lock();
        let id = self
            .store
            .transaction(|state| state.register_company(name, email, starting))?;
        conservation.record_seed(self.config.starting_cash, self.config.starting_carbon);
        info!(company = %id, name, "company registered");
        Ok(id)
    }

    /// Current cash and carbon position of a company.
    pub fn balances(&self, company: CompanyId) -> Result<AccountBalance> {
        self.store.read(|state| state.balance(company))
    }

    /// Validate, persist, and broadcast a new request.
    ///
    /// Side effect: one request row plus one delivery row per company
    /// registered at this moment, excluding the requester.
    pub fn create_request(
        &self,
        requester: CompanyId,
        kind: RequestKind,
        reason: &str,
        unit_price: Decimal,
        quantity: Decimal,
    ) -> Result<RequestId> {
        let request = lifecycle::new_request(requester, kind, reason, unit_price, quantity)?;
        let request_id = request.id;

        let delivered = self.store.transaction(|state| {
            state.company(requester)?;
            let receivers = state.company_ids_except(requester);
            let deliveries = fanout::fan_out(request_id, &receivers);
            let count = deliveries.len();
            state.insert_request(request);
            for delivery in deliveries {
                state.insert_delivery(delivery);
            }
            Ok(count)
        })?;

        info!(request = %request_id, %kind, delivered, "request created and broadcast");
        Ok(request_id)
    }

    /// Requests posted by a company, newest first.
    pub fn list_own_requests(&self, company: CompanyId) -> Result<Vec<OutstandingRequest>> {
        self.store.read(|state| {
            state.company(company)?;
            Ok(state.requests_by(company))
        })
    }

    /// Requests broadcast to a company, joined to their authoritative
    /// status with overdue derived against the current clock.
    pub fn list_received_requests(&self, company: CompanyId) -> Result<Vec<ReceivedRequest>> {
        let now = Utc::now();
        let grace = self.config.overdue_grace();
        self.store.read(|state| {
            state.company(company)?;
            state
                .deliveries_for(company)
                .into_iter()
                .map(|delivery| {
                    let request = state.request(delivery.request_id)?;
                    Ok(ReceivedRequest::join(delivery, request, now, grace))
                })
                .collect()
        })
    }

    /// Apply a receiver's decision to a pending request.
    ///
    /// ACCEPT settles: both balances and the status flip happen in one
    /// transaction, or nothing happens at all. A transfer rejected for
    /// insufficient funds leaves the request PENDING so another receiver
    /// may still accept it.
    pub fn decide(
        &self,
        request_id: RequestId,
        decider: CompanyId,
        decision: Decision,
    ) -> Result<RequestStatus> {
        let result = self.store.transaction(|state| {
            let request = state.request(request_id)?.clone();

            // Only companies the request was broadcast to may decide it.
            if state.delivery_for_request(request_id, decider).is_none() {
                return Err(CarbonclearError::NotOffered {
                    caller: decider,
                    request: request_id,
                });
            }

            let new_status = lifecycle::transition(&request, decision)?;

            if new_status == RequestStatus::Accepted {
                let requester_bal = state.balance(request.requester)?;
                let receiver_bal = state.balance(decider)?;
                let outcome = transfer::plan_transfer(
                    request.kind,
                    &requester_bal,
                    &receiver_bal,
                    request.unit_price,
                    request.quantity,
                )?;
                // Plan succeeded: from here on every write must land.
                state.apply_balances(
                    (request.requester, outcome.requester),
                    (decider, outcome.receiver),
                )?;
            }

            state.set_request_status(request_id, new_status)?;
            Ok(new_status)
        });

        match &result {
            Ok(status) => {
                info!(request = %request_id, decider = %decider, %status, "request decided");
            }
            Err(err) if err.is_conflict() => {
                debug!(request = %request_id, decider = %decider, %err, "decision lost the race");
            }
            Err(err) => {
                warn!(request = %request_id, decider = %decider, %err, "decision rejected");
            }
        }
        result
    }

    /// Acknowledge the overdue alert on a delivery. Idempotent.
    pub fn mark_overdue_viewed(&self, delivery_id: DeliveryId, caller: CompanyId) -> Result<()> {
        self.store.transaction(|state| {
            let delivery = state.delivery(delivery_id)?;
            if delivery.receiver != caller {
                return Err(CarbonclearError::NotReceiver { caller });
            }
            state.delivery_mut(delivery_id)?.overdue_alert_viewed = true;
            Ok(())
        })
    }

    /// Check that ledger-wide cash and carbon totals still equal the sums
    /// seeded at registration.
    pub fn verify_conservation(&self) -> Result<()> {
        let conservation = self.conservation.lock();
        let (cash, carbon) = self.store.read(|state| (state.total_cash(), state.total_carbon()));
        conservation.verify(cash, carbon)
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_companies(n: usize) -> (SettlementEngine, Vec<CompanyId>) {
        let engine = SettlementEngine::default();
        let ids = (0..n)
            .map(|i| {
                engine
                    .register_company(&format!("Company {i}"), &format!("c{i}@x.example"))
                    .unwrap()
            })
            .collect();
        (engine, ids)
    }

    #[test]
    fn registration_seeds_config_balances() {
        let (engine, ids) = engine_with_companies(1);
        let bal = engine.balances(ids[0]).unwrap();
        assert_eq!(bal.cash, Decimal::new(500_000, 0));
        assert_eq!(bal.carbon, Decimal::new(1000, 0));
        engine.verify_conservation().unwrap();
    }

    #[test]
    fn create_request_fans_out_to_all_others() {
        let (engine, ids) = engine_with_companies(5);
        engine
            .create_request(
                ids[0],
                RequestKind::Sell,
                "surplus credits",
                Decimal::new(10, 0),
                Decimal::new(100, 0),
            )
            .unwrap();

        // 5 companies -> 4 deliveries, none to the requester.
        for (i, &id) in ids.iter().enumerate() {
            let received = engine.list_received_requests(id).unwrap();
            assert_eq!(received.len(), usize::from(i != 0));
        }
    }

    #[test]
    fn late_registrants_receive_nothing() {
        let (engine, ids) = engine_with_companies(2);
        engine
            .create_request(
                ids[0],
                RequestKind::Buy,
                "need offsets",
                Decimal::ONE,
                Decimal::ONE,
            )
            .unwrap();

        let late = engine
            .register_company("Latecomer", "late@x.example")
            .unwrap();
        assert!(engine.list_received_requests(late).unwrap().is_empty());
    }

    #[test]
    fn invalid_create_persists_nothing() {
        let (engine, ids) = engine_with_companies(2);
        let err = engine
            .create_request(ids[0], RequestKind::Buy, "", Decimal::ONE, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, CarbonclearError::InvalidRequest { .. }));
        assert!(engine.list_own_requests(ids[0]).unwrap().is_empty());
        assert!(engine.list_received_requests(ids[1]).unwrap().is_empty());
    }

    #[test]
    fn create_for_unknown_company_fails() {
        let (engine, _) = engine_with_companies(1);
        let err = engine
            .create_request(
                CompanyId::new(),
                RequestKind::Buy,
                "reason",
                Decimal::ONE,
                Decimal::ONE,
            )
            .unwrap_err();
        assert!(matches!(err, CarbonclearError::CompanyNotFound(_)));
    }

    #[test]
    fn own_requests_listed_newest_first() {
        let (engine, ids) = engine_with_companies(2);
        let first = engine
            .create_request(ids[0], RequestKind::Buy, "first", Decimal::ONE, Decimal::ONE)
            .unwrap();
        let second = engine
            .create_request(ids[0], RequestKind::Sell, "second", Decimal::ONE, Decimal::ONE)
            .unwrap();

        let own = engine.list_own_requests(ids[0]).unwrap();
        assert_eq!(own.len(), 2);
        assert_eq!(own[0].id, second);
        assert_eq!(own[1].id, first);
        assert!(engine.list_own_requests(ids[1]).unwrap().is_empty());
    }

    #[test]
    fn reject_leaves_balances_untouched() {
        let (engine, ids) = engine_with_companies(2);
        let request = engine
            .create_request(
                ids[0],
                RequestKind::Sell,
                "surplus",
                Decimal::new(10, 0),
                Decimal::new(100, 0),
            )
            .unwrap();

        let status = engine.decide(request, ids[1], Decision::Reject).unwrap();
        assert_eq!(status, RequestStatus::Rejected);
        assert_eq!(engine.balances(ids[0]).unwrap().cash, Decimal::new(500_000, 0));
        assert_eq!(engine.balances(ids[1]).unwrap().carbon, Decimal::new(1000, 0));
        engine.verify_conservation().unwrap();
    }

    #[test]
    fn accept_settles_and_flips_status() {
        let (engine, ids) = engine_with_companies(2);
        let request = engine
            .create_request(
                ids[0],
                RequestKind::Sell,
                "surplus",
                Decimal::new(10, 0),
                Decimal::new(100, 0),
            )
            .unwrap();

        let status = engine.decide(request, ids[1], Decision::Accept).unwrap();
        assert_eq!(status, RequestStatus::Accepted);

        let a = engine.balances(ids[0]).unwrap();
        let b = engine.balances(ids[1]).unwrap();
        assert_eq!(a.cash, Decimal::new(501_000, 0));
        assert_eq!(a.carbon, Decimal::new(900, 0));
        assert_eq!(b.cash, Decimal::new(499_000, 0));
        assert_eq!(b.carbon, Decimal::new(1100, 0));

        let received = engine.list_received_requests(ids[1]).unwrap();
        assert_eq!(received[0].status, RequestStatus::Accepted);
        engine.verify_conservation().unwrap();
    }

    #[test]
    fn second_decision_conflicts_without_mutation() {
        let (engine, ids) = engine_with_companies(3);
        let request = engine
            .create_request(
                ids[0],
                RequestKind::Sell,
                "surplus",
                Decimal::new(10, 0),
                Decimal::new(100, 0),
            )
            .unwrap();

        engine.decide(request, ids[1], Decision::Accept).unwrap();
        let err = engine.decide(request, ids[2], Decision::Accept).unwrap_err();
        assert!(err.is_conflict());

        // The losing decision moved no value.
        assert_eq!(engine.balances(ids[2]).unwrap().cash, Decimal::new(500_000, 0));
        assert_eq!(engine.balances(ids[2]).unwrap().carbon, Decimal::new(1000, 0));
        engine.verify_conservation().unwrap();
    }

    #[test]
    fn insufficient_funds_keeps_request_pending() {
        let config = EngineConfig {
            starting_cash: Decimal::new(50, 0),
            ..EngineConfig::default()
        };
        let engine = SettlementEngine::new(config);
        let seller = engine.register_company("Seller", "s@x.example").unwrap();
        let broke = engine.register_company("Broke", "b@x.example").unwrap();

        // total = 1000, receiver only holds 50 cash.
        let request = engine
            .create_request(
                seller,
                RequestKind::Sell,
                "surplus",
                Decimal::new(10, 0),
                Decimal::new(100, 0),
            )
            .unwrap();

        let err = engine.decide(request, broke, Decision::Accept).unwrap_err();
        assert!(matches!(err, CarbonclearError::InsufficientFunds { .. }));

        // Still pending, balances untouched, a later accept may succeed.
        let own = engine.list_own_requests(seller).unwrap();
        assert_eq!(own[0].status, RequestStatus::Pending);
        assert_eq!(engine.balances(broke).unwrap().cash, Decimal::new(50, 0));
        engine.verify_conservation().unwrap();
    }

    #[test]
    fn decide_unknown_request_not_found() {
        let (engine, ids) = engine_with_companies(1);
        let err = engine
            .decide(RequestId::new(), ids[0], Decision::Accept)
            .unwrap_err();
        assert!(matches!(err, CarbonclearError::RequestNotFound(_)));
    }

    #[test]
    fn requester_cannot_decide_own_request() {
        let (engine, ids) = engine_with_companies(2);
        let request = engine
            .create_request(ids[0], RequestKind::Buy, "reason", Decimal::ONE, Decimal::ONE)
            .unwrap();
        let err = engine.decide(request, ids[0], Decision::Accept).unwrap_err();
        assert!(matches!(err, CarbonclearError::NotOffered { .. }));
    }

    #[test]
    fn uninvited_company_cannot_decide() {
        let (engine, ids) = engine_with_companies(2);
        let request = engine
            .create_request(ids[0], RequestKind::Buy, "reason", Decimal::ONE, Decimal::ONE)
            .unwrap();
        let late = engine.register_company("Late", "late@x.example").unwrap();
        let err = engine.decide(request, late, Decision::Accept).unwrap_err();
        assert!(matches!(err, CarbonclearError::NotOffered { .. }));
    }

    #[test]
    fn mark_viewed_is_idempotent_and_owner_only() {
        let (engine, ids) = engine_with_companies(2);
        engine
            .create_request(ids[0], RequestKind::Buy, "reason", Decimal::ONE, Decimal::ONE)
            .unwrap();

        let delivery_id = engine.list_received_requests(ids[1]).unwrap()[0].delivery_id;

        engine.mark_overdue_viewed(delivery_id, ids[1]).unwrap();
        engine.mark_overdue_viewed(delivery_id, ids[1]).unwrap();
        assert!(engine.list_received_requests(ids[1]).unwrap()[0].overdue_alert_viewed);

        let err = engine.mark_overdue_viewed(delivery_id, ids[0]).unwrap_err();
        assert!(matches!(err, CarbonclearError::NotReceiver { .. }));

        let err = engine
            .mark_overdue_viewed(DeliveryId::new(), ids[1])
            .unwrap_err();
        assert!(matches!(err, CarbonclearError::DeliveryNotFound(_)));
    }

    #[test]
    fn fresh_request_is_not_overdue() {
        let (engine, ids) = engine_with_companies(2);
        engine
            .create_request(ids[0], RequestKind::Buy, "reason", Decimal::ONE, Decimal::ONE)
            .unwrap();
        let received = engine.list_received_requests(ids[1]).unwrap();
        assert!(!received[0].overdue);
        assert!(!received[0].overdue_alert_viewed);
    }
}
