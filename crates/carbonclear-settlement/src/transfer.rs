//! The two-sided balance-transfer algorithm.
//!
//! [`plan_transfer`] is pure: it takes both parties' current balances and
//! returns both post-transfer balances, or an error. Every sufficiency
//! check runs before any arithmetic result is produced, so a failed plan
//! cannot leave a partial transfer observable — the caller only writes
//! balances back when planning succeeded.
//!
//! Direction depends on the request kind:
//! - `BUY`: requester pays cash and receives carbon; the accepting
//!   receiver supplies the carbon.
//! - `SELL`: requester supplies carbon and receives cash.
//!
//! Conservation holds exactly under `Decimal` arithmetic: the cash and
//! carbon deltas of the two parties cancel to zero with no rounding drift.

use carbonclear_types::{
    AccountBalance, AssetKind, CarbonclearError, RequestKind, Result, TransferParty,
};
use rust_decimal::Decimal;

/// Both parties' balances after a planned transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub requester: AccountBalance,
    pub receiver: AccountBalance,
}

/// Plan the settlement of a request between its requester and an accepting
/// receiver.
///
/// # Errors
/// Returns [`CarbonclearError::InsufficientFunds`] naming the short party
/// and asset. On error neither input balance has been touched.
pub fn plan_transfer(
    kind: RequestKind,
    requester: &AccountBalance,
    receiver: &AccountBalance,
    unit_price: Decimal,
    quantity: Decimal,
) -> Result<TransferOutcome> {
    let total = unit_price * quantity;

    match kind {
        RequestKind::Buy => {
            // Receiver sells carbon to the requester.
            if receiver.carbon < quantity {
                return Err(CarbonclearError::InsufficientFunds {
                    party: TransferParty::Receiver,
                    asset: AssetKind::Carbon,
                    needed: quantity,
                    available: receiver.carbon,
                });
            }
            if requester.cash < total {
                return Err(CarbonclearError::InsufficientFunds {
                    party: TransferParty::Requester,
                    asset: AssetKind::Cash,
                    needed: total,
                    available: requester.cash,
                });
            }
            Ok(TransferOutcome {
                requester: AccountBalance {
                    cash: requester.cash - total,
                    carbon: requester.carbon + quantity,
                },
                receiver: AccountBalance {
                    cash: receiver.cash + total,
                    carbon: receiver.carbon - quantity,
                },
            })
        }
        RequestKind::Sell => {
            // Receiver buys carbon from the requester.
            if requester.carbon < quantity {
                return Err(CarbonclearError::InsufficientFunds {
                    party: TransferParty::Requester,
                    asset: AssetKind::Carbon,
                    needed: quantity,
                    available: requester.carbon,
                });
            }
            if receiver.cash < total {
                return Err(CarbonclearError::InsufficientFunds {
                    party: TransferParty::Receiver,
                    asset: AssetKind::Cash,
                    needed: total,
                    available: receiver.cash,
                });
            }
            Ok(TransferOutcome {
                requester: AccountBalance {
                    cash: requester.cash + total,
                    carbon: requester.carbon - quantity,
                },
                receiver: AccountBalance {
                    cash: receiver.cash - total,
                    carbon: receiver.carbon + quantity,
                },
            })
        }
    }
}
