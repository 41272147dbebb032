//! # Faculty Accessor
//!
//! Natural key: (organization, department, account).

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::FacultyRow;
use serde_json::Value;
use shared_types::{AccessError, Address, Faculty, UpsertOutcome};
use tracing::warn;

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

pub struct FacultyAccessor<T: LedgerTransport> {
    backend: Backend<T, FacultyRow>,
}

impl<T: LedgerTransport> FacultyAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    pub fn get(
        &self,
        org: &str,
        department: &str,
        account: Address,
    ) -> Result<Option<Faculty>, AccessError> {
        Ok(self
            .list(org, department)?
            .into_iter()
            .find(|f| f.account == account))
    }

    /// Faculty of one department, insertion order preserved.
    pub fn list(&self, org: &str, department: &str) -> Result<Vec<Faculty>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value =
                    handle.call("getFaculty", &[org.into(), department.into()])?;
                let wallets = wire::addresses(&value, 0)?;
                let names = wire::strings(&value, 1)?;
                let roles = wire::strings(&value, 2)?;
                Ok(wallets
                    .into_iter()
                    .zip(names)
                    .zip(roles)
                    .map(|((account, name), role)| Faculty {
                        organization: org.to_owned(),
                        department: department.to_owned(),
                        account,
                        name,
                        role,
                    })
                    .collect())
            }
            Backend::Tabular(table) => Ok(table
                .query(|r| r.college_name == org && r.dept_name == department)
                .into_iter()
                .map(|r| Faculty {
                    organization: r.college_name,
                    department: r.dept_name,
                    account: r.wallet,
                    name: r.name,
                    role: r.role,
                })
                .collect()),
        }
    }

    pub fn upsert(
        &mut self,
        faculty: &Faculty,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(&faculty.organization)?;

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    faculty.organization.clone().into(),
                    faculty.department.clone().into(),
                    faculty.account.to_string().into(),
                    faculty.name.clone().into(),
                    faculty.role.clone().into(),
                ];
                let tx_id = handle.send(&key, "addFaculty", args, gas::ADD_FACULTY)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                if table.exists(|r| {
                    r.college_name == faculty.organization
                        && r.dept_name == faculty.department
                        && r.wallet == faculty.account
                }) {
                    warn!(org = %faculty.organization, account = %faculty.account, "faculty already exists");
                    return Ok(UpsertOutcome::AlreadyExists);
                }
                table
                    .append(FacultyRow {
                        college_name: faculty.organization.clone(),
                        dept_name: faculty.department.clone(),
                        wallet: faculty.account,
                        name: faculty.name.clone(),
                        role: faculty.role.clone(),
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}
