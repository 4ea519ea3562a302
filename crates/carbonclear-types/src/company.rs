//! Company identity.
//!
//! A company is created once at registration and is immutable afterwards
//! (credential rotation happens outside the engine). Name and email are
//! unique across the registry; the ledger enforces that at registration.

use serde::{Deserialize, Serialize};

use crate::CompanyId;

/// A registered marketplace participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    /// Unique display name.
    pub name: String,
    /// Unique contact email, stored lowercased.
    pub email: String,
}

impl Company {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            email: email.into().to_lowercase(),
        }
    }
}
