//! The ledger's tables: companies, balances, requests, deliveries.
//!
//! `LedgerState` is plain data with typed accessors. It performs no
//! locking itself — [`crate::LedgerStore`] owns the lock and hands a
//! `&mut LedgerState` to one transaction at a time. Accessors follow
//! check-then-mutate: lookups return `CC_ERR_` NotFound errors and writes
//! only happen after every check has passed.

use std::collections::HashMap;

use carbonclear_types::{
    AccountBalance, CarbonclearError, Company, CompanyId, Delivery, DeliveryId,
    OutstandingRequest, RequestId, RequestStatus, Result, constants,
};
use rust_decimal::Decimal;

/// Map-backed ledger tables plus a receiver index for delivery lookups.
#[derive(Debug, Default)]
pub struct LedgerState {
    companies: HashMap<CompanyId, Company>,
    balances: HashMap<CompanyId, AccountBalance>,
    requests: HashMap<RequestId, OutstandingRequest>,
    deliveries: HashMap<DeliveryId, Delivery>,
    /// DeliveryIds per receiving company, in creation order.
    by_receiver: HashMap<CompanyId, Vec<DeliveryId>>,
}

impl LedgerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Companies & balances
    // -----------------------------------------------------------------

    /// Register a company with its starting balance. Name and email must
    /// be unique across the registry.
    pub fn register_company(
        &mut self,
        name: &str,
        email: &str,
        starting: AccountBalance,
    ) -> Result<CompanyId> {
        let name = name.trim();
        let email = email.trim().to_lowercase();

        if name.is_empty() || name.len() > constants::MAX_NAME_LEN {
            return Err(CarbonclearError::InvalidRequest {
                reason: "company name must be non-empty".to_string(),
            });
        }
        if !email.contains('@') || email.len() > constants::MAX_NAME_LEN {
            return Err(CarbonclearError::InvalidRequest {
                reason: "a valid email is required".to_string(),
            });
        }
        if self.companies.values().any(|c| c.name == name) {
            return Err(CarbonclearError::DuplicateName(name.to_string()));
        }
        if self.companies.values().any(|c| c.email == email) {
            return Err(CarbonclearError::DuplicateEmail(email));
        }

        let company = Company::new(name, email);
        let id = company.id;
        self.companies.insert(id, company);
        self.balances.insert(id, starting);
        Ok(id)
    }

    pub fn company(&self, id: CompanyId) -> Result<&Company> {
        self.companies
            .get(&id)
            .ok_or(CarbonclearError::CompanyNotFound(id))
    }

    #[must_use]
    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    /// All registered companies except the given one — the fan-out
    /// snapshot at request-creation time.
    #[must_use]
    pub fn company_ids_except(&self, excluded: CompanyId) -> Vec<CompanyId> {
        self.companies
            .keys()
            .copied()
            .filter(|id| *id != excluded)
            .collect()
    }

    pub fn balance(&self, id: CompanyId) -> Result<AccountBalance> {
        // A registered company always has a balance row.
        self.company(id)?;
        self.balances
            .get(&id)
            .cloned()
            .ok_or(CarbonclearError::BalanceNotFound(id))
    }

    /// Write both parties' post-transfer balances. The caller has already
    /// planned and checked the transfer; this is the last step of the
    /// transaction and cannot fail partway.
    pub fn apply_balances(
        &mut self,
        requester: (CompanyId, AccountBalance),
        receiver: (CompanyId, AccountBalance),
    ) -> Result<()> {
        if !self.balances.contains_key(&requester.0) {
            return Err(CarbonclearError::BalanceNotFound(requester.0));
        }
        if !self.balances.contains_key(&receiver.0) {
            return Err(CarbonclearError::BalanceNotFound(receiver.0));
        }
        self.balances.insert(requester.0, requester.1);
        self.balances.insert(receiver.0, receiver.1);
        Ok(())
    }

    /// Sum of all companies' cash positions.
    #[must_use]
    pub fn total_cash(&self) -> Decimal {
        self.balances.values().map(|b| b.cash).sum()
    }

    /// Sum of all companies' carbon positions.
    #[must_use]
    pub fn total_carbon(&self) -> Decimal {
        self.balances.values().map(|b| b.carbon).sum()
    }

    // -----------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------

    pub fn insert_request(&mut self, request: OutstandingRequest) {
        self.requests.insert(request.id, request);
    }

    pub fn request(&self, id: RequestId) -> Result<&OutstandingRequest> {
        self.requests
            .get(&id)
            .ok_or(CarbonclearError::RequestNotFound(id))
    }

    /// Flip a request's status. Transition legality (single-shot
    /// PENDING → terminal) is enforced by the lifecycle layer before this
    /// write is reached.
    pub fn set_request_status(&mut self, id: RequestId, status: RequestStatus) -> Result<()> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(CarbonclearError::RequestNotFound(id))?;
        request.status = status;
        Ok(())
    }

    /// All requests posted by a company, newest first.
    #[must_use]
    pub fn requests_by(&self, requester: CompanyId) -> Vec<OutstandingRequest> {
        let mut out: Vec<OutstandingRequest> = self
            .requests
            .values()
            .filter(|r| r.requester == requester)
            .cloned()
            .collect();
        // UUIDv7 ids are time-ordered, breaking ties on equal timestamps.
        out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        out
    }

    // -----------------------------------------------------------------
    // Deliveries
    // -----------------------------------------------------------------

    pub fn insert_delivery(&mut self, delivery: Delivery) {
        self.by_receiver
            .entry(delivery.receiver)
            .or_default()
            .push(delivery.id);
        self.deliveries.insert(delivery.id, delivery);
    }

    pub fn delivery(&self, id: DeliveryId) -> Result<&Delivery> {
        self.deliveries
            .get(&id)
            .ok_or(CarbonclearError::DeliveryNotFound(id))
    }

    pub fn delivery_mut(&mut self, id: DeliveryId) -> Result<&mut Delivery> {
        self.deliveries
            .get_mut(&id)
            .ok_or(CarbonclearError::DeliveryNotFound(id))
    }

    /// All deliveries addressed to a company, in creation order.
    #[must_use]
    pub fn deliveries_for(&self, receiver: CompanyId) -> Vec<&Delivery> {
        self.by_receiver
            .get(&receiver)
            .map(|ids| ids.iter().filter_map(|id| self.deliveries.get(id)).collect())
            .unwrap_or_default()
    }

    /// The delivery (if any) offering `request_id` to `receiver`.
    #[must_use]
    pub fn delivery_for_request(
        &self,
        request_id: RequestId,
        receiver: CompanyId,
    ) -> Option<&Delivery> {
        self.by_receiver.get(&receiver).and_then(|ids| {
            ids.iter()
                .filter_map(|id| self.deliveries.get(id))
                .find(|d| d.request_id == request_id)
        })
    }
}
