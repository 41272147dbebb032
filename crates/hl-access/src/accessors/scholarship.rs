//! # Scholarship Accessor
//!
//! Read-only from this layer: no write path exists, not even in the
//! fallback tables.

use hl_ledger_client::LedgerTransport;
use hl_tabular_store::ScholarshipRow;
use primitive_types::U256;
use shared_types::{AccessError, Address, Scholarship};

use super::{require_org, wire, Backend};
use crate::session::Session;

pub struct ScholarshipAccessor<T: LedgerTransport> {
    backend: Backend<T, ScholarshipRow>,
}

impl<T: LedgerTransport> ScholarshipAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    /// The awarded amount, `None` when no scholarship is recorded. The
    /// ledger reports zero for unknown accounts, which normalizes to
    /// `None` here to match the tabular side.
    pub fn get(&self, org: &str, account: Address) -> Result<Option<Scholarship>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call(
                    "getScholarship",
                    &[org.into(), account.to_string().into()],
                )?;
                let amount = wire::scalar_amount(&value)?;
                Ok((amount > 0).then(|| Scholarship {
                    amount: U256::from(amount),
                }))
            }
            Backend::Tabular(table) => Ok(table
                .find(|r| r.college_name == org && r.wallet == account)
                .map(|r| Scholarship {
                    amount: U256::from(r.amount),
                })),
        }
    }
}
