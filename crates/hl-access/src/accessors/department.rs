//! # Department Accessor
//!
//! Natural key: (organization, department name).

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::DepartmentRow;
use serde_json::Value;
use shared_types::{AccessError, Department, UpsertOutcome};
use tracing::warn;

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

pub struct DepartmentAccessor<T: LedgerTransport> {
    backend: Backend<T, DepartmentRow>,
}

impl<T: LedgerTransport> DepartmentAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    /// Fetch one department, `None` when absent.
    pub fn get(&self, org: &str, name: &str) -> Result<Option<Department>, AccessError> {
        require_org(org)?;
        Ok(self
            .list(org)?
            .into_iter()
            .find(|d| d.name == name))
    }

    /// All departments of an organization, insertion order preserved.
    pub fn list(&self, org: &str) -> Result<Vec<Department>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call("getDepartments", &[org.into()])?;
                let names = wire::strings(&value, 0)?;
                let admins = wire::addresses(&value, 1)?;
                Ok(names
                    .into_iter()
                    .zip(admins)
                    .map(|(name, admin)| Department {
                        organization: org.to_owned(),
                        name,
                        admin,
                    })
                    .collect())
            }
            Backend::Tabular(table) => Ok(table
                .query(|r| r.college_name == org)
                .into_iter()
                .map(|r| Department {
                    organization: r.college_name,
                    name: r.dept_name,
                    admin: r.dept_admin,
                })
                .collect()),
        }
    }

    /// Insert a department. The credential is consumed only for ledger
    /// writes; in tabular mode a natural-key conflict leaves the existing
    /// row untouched.
    pub fn upsert(
        &mut self,
        dept: &Department,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(&dept.organization)?;
        if dept.name.trim().is_empty() {
            return Err(AccessError::Validation {
                field: "department",
                reason: "must not be empty".into(),
            });
        }

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    dept.organization.clone().into(),
                    dept.name.clone().into(),
                    dept.admin.to_string().into(),
                ];
                let tx_id = handle.send(&key, "addDepartment", args, gas::ADD_DEPARTMENT)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                if table.exists(|r| {
                    r.college_name == dept.organization && r.dept_name == dept.name
                }) {
                    warn!(org = %dept.organization, dept = %dept.name, "department already exists");
                    return Ok(UpsertOutcome::AlreadyExists);
                }
                table
                    .append(DepartmentRow {
                        college_name: dept.organization.clone(),
                        dept_name: dept.name.clone(),
                        dept_admin: dept.admin,
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}
