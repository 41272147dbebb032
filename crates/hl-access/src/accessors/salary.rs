//! # Salary Accessor
//!
//! Salary is one of the two explicitly mutable fields in the system: a
//! tabular set overwrites in place (or inserts the first row) without a
//! conflict outcome.

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::SalaryRow;
use primitive_types::U256;
use serde_json::Value;
use shared_types::{AccessError, Address, UpsertOutcome};

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

pub struct SalaryAccessor<T: LedgerTransport> {
    backend: Backend<T, SalaryRow>,
}

impl<T: LedgerTransport> SalaryAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.clinic_contract)?,
        })
    }

    /// Current salary, `None` when never set.
    pub fn get(&self, org: &str, account: Address) -> Result<Option<U256>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                // The ledger read surface reports salaries through the
                // staff list; a member absent from it has no salary.
                let value = handle.call("getStaffList", &[org.into()])?;
                let accounts = wire::addresses(&value, 0)?;
                let salaries = wire::amounts(&value, 3)?;
                Ok(accounts
                    .iter()
                    .position(|a| *a == account)
                    .and_then(|i| salaries.get(i).copied())
                    .map(U256::from))
            }
            Backend::Tabular(table) => Ok(table
                .find(|r| r.hospital_name == org && r.staff_address == account)
                .map(|r| U256::from(r.salary_wei))),
        }
    }

    /// Set a staff member's salary, overwriting any previous value.
    pub fn set(
        &mut self,
        org: &str,
        account: Address,
        amount: U256,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(org)?;
        let amount_wei = u128::try_from(amount).map_err(|_| AccessError::Validation {
            field: "salary",
            reason: "amount exceeds the supported range".into(),
        })?;

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    org.into(),
                    account.to_string().into(),
                    amount_wei.to_string().into(),
                ];
                let tx_id = handle.send(&key, "setSalary", args, gas::SET_SALARY)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                let updated = table
                    .update_where(
                        |r| r.hospital_name == org && r.staff_address == account,
                        |r| r.salary_wei = amount_wei,
                    )
                    .map_err(store_err)?;
                if !updated {
                    table
                        .append(SalaryRow {
                            hospital_name: org.to_owned(),
                            staff_address: account,
                            salary_wei: amount_wei,
                        })
                        .map_err(store_err)?;
                }
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}
