//! # Points Accessor
//!
//! A redeemable, non-negative balance per (organization, account). Points
//! are the second explicitly mutable field: redemption resets the balance
//! to zero in place. A zero or absent balance redeems to a
//! nothing-to-redeem outcome with no mutation.

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::PointsRow;
use shared_types::{AccessError, Address, PointsBalance, RedeemOutcome};
use tracing::info;

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

pub struct PointsAccessor<T: LedgerTransport> {
    backend: Backend<T, PointsRow>,
}

impl<T: LedgerTransport> PointsAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    /// Current balance; absent accounts report zero.
    pub fn balance(&self, org: &str, account: Address) -> Result<PointsBalance, AccessError> {
        require_org(org)?;
        let balance = match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call(
                    "getPoints",
                    &[org.into(), account.to_string().into()],
                )?;
                wire::scalar_u64(&value)?
            }
            Backend::Tabular(table) => table
                .find(|r| r.college_name == org && r.wallet == account)
                .map(|r| r.points)
                .unwrap_or(0),
        };
        Ok(PointsBalance { balance })
    }

    /// Redeem the whole balance.
    ///
    /// On the ledger the credential must control `account`, because the
    /// contract redeems for the transaction submitter.
    pub fn redeem(
        &mut self,
        org: &str,
        account: Address,
        credential: &str,
    ) -> Result<RedeemOutcome, AccessError> {
        require_org(org)?;

        // Read first so a zero balance never spends a transaction.
        let current = self.balance(org, account)?.balance;
        if current == 0 {
            return Ok(RedeemOutcome::NothingToRedeem);
        }

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                if key.address() != account {
                    return Err(AccessError::Validation {
                        field: "private_key",
                        reason: "key does not control the redeeming account".into(),
                    });
                }
                let tx_id =
                    handle.send(&key, "redeemPoints", vec![org.into()], gas::REDEEM_POINTS)?;
                info!(%account, points = current, "points redeemed on ledger");
                Ok(RedeemOutcome::Redeemed {
                    points: current,
                    tx_id: Some(tx_id.to_string()),
                })
            }
            Backend::Tabular(table) => {
                table
                    .update_where(
                        |r| r.college_name == org && r.wallet == account,
                        |r| r.points = 0,
                    )
                    .map_err(store_err)?;
                info!(%account, points = current, "points redeemed in fallback table");
                Ok(RedeemOutcome::Redeemed {
                    points: current,
                    tx_id: None,
                })
            }
        }
    }
}
