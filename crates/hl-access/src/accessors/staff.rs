//! # Staff Accessor
//!
//! Natural key: (organization, account). In tabular mode the staff list is
//! a join of `staff.csv` and `salary.csv`; missing salary rows report as
//! zero, and the fallback has no active column so active is always true.

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::{CsvTable, SalaryRow, StaffRow};
use primitive_types::U256;
use serde_json::Value;
use shared_types::{AccessError, Address, BackendKind, StaffMember, UpsertOutcome};
use tracing::warn;

use super::{parse_key, require_org, store_err, wire, LedgerHandle};
use crate::session::Session;

enum StaffBackend<T: LedgerTransport> {
    Ledger(LedgerHandle<T>),
    Tabular {
        staff: CsvTable<StaffRow>,
        salary: CsvTable<SalaryRow>,
    },
}

pub struct StaffAccessor<T: LedgerTransport> {
    backend: StaffBackend<T>,
}

impl<T: LedgerTransport> StaffAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        let backend = match session.backend() {
            BackendKind::Ledger => {
                StaffBackend::Ledger(LedgerHandle::bind(session, session.config.clinic_contract))
            }
            BackendKind::Tabular => StaffBackend::Tabular {
                staff: CsvTable::open(&session.config.data_dir).map_err(store_err)?,
                salary: CsvTable::open(&session.config.data_dir).map_err(store_err)?,
            },
        };
        Ok(Self { backend })
    }

    pub fn get(&self, org: &str, account: Address) -> Result<Option<StaffMember>, AccessError> {
        Ok(self
            .list(org)?
            .into_iter()
            .find(|m| m.account == account))
    }

    /// All staff of an organization with their current salaries.
    pub fn list(&self, org: &str) -> Result<Vec<StaffMember>, AccessError> {
        require_org(org)?;
        match &self.backend {
            StaffBackend::Ledger(handle) => {
                let value = handle.call("getStaffList", &[org.into()])?;
                let accounts = wire::addresses(&value, 0)?;
                let names = wire::strings(&value, 1)?;
                let roles = wire::strings(&value, 2)?;
                let salaries = wire::amounts(&value, 3)?;
                let actives = wire::bools(&value, 4)?;

                Ok(accounts
                    .into_iter()
                    .enumerate()
                    .map(|(i, account)| StaffMember {
                        organization: org.to_owned(),
                        account,
                        name: names.get(i).cloned().unwrap_or_default(),
                        role: roles.get(i).cloned().unwrap_or_default(),
                        salary: U256::from(salaries.get(i).copied().unwrap_or(0)),
                        active: actives.get(i).copied().unwrap_or(true),
                    })
                    .collect())
            }
            StaffBackend::Tabular { staff, salary } => Ok(staff
                .query(|r| r.hospital_name == org)
                .into_iter()
                .map(|r| {
                    let pay = salary
                        .find(|s| s.hospital_name == org && s.staff_address == r.staff_address)
                        .map(|s| s.salary_wei)
                        .unwrap_or(0);
                    StaffMember {
                        organization: r.hospital_name,
                        account: r.staff_address,
                        name: r.staff_name,
                        role: r.staff_role,
                        salary: U256::from(pay),
                        active: true,
                    }
                })
                .collect()),
        }
    }

    /// Add a staff member. Salary starts at zero; set it via the salary
    /// accessor.
    pub fn upsert(
        &mut self,
        member: &StaffMember,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(&member.organization)?;

        match &mut self.backend {
            StaffBackend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    member.organization.clone().into(),
                    member.account.to_string().into(),
                    member.name.clone().into(),
                    member.role.clone().into(),
                ];
                let tx_id = handle.send(&key, "addStaff", args, gas::ADD_STAFF)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            StaffBackend::Tabular { staff, .. } => {
                if staff.exists(|r| {
                    r.hospital_name == member.organization && r.staff_address == member.account
                }) {
                    warn!(org = %member.organization, account = %member.account, "staff already exists");
                    return Ok(UpsertOutcome::AlreadyExists);
                }
                staff
                    .append(StaffRow {
                        hospital_name: member.organization.clone(),
                        staff_address: member.account,
                        staff_name: member.name.clone(),
                        staff_role: member.role.clone(),
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}
