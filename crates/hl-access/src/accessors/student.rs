//! # Student Accessor
//!
//! Natural key: (organization, account). The year field is validated to
//! 1..=4 before any backend call.

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::StudentRow;
use serde_json::Value;
use shared_types::{AccessError, Address, Student, UpsertOutcome};
use tracing::warn;

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

fn validate_year(year: u8) -> Result<(), AccessError> {
    if !(1..=4).contains(&year) {
        return Err(AccessError::Validation {
            field: "year",
            reason: format!("must be between 1 and 4, got {year}"),
        });
    }
    Ok(())
}

pub struct StudentAccessor<T: LedgerTransport> {
    backend: Backend<T, StudentRow>,
}

impl<T: LedgerTransport> StudentAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    /// One student by account, `None` when absent. Absence is an explicit
    /// result here, never conflated with a connectivity failure.
    pub fn get(&self, org: &str, account: Address) -> Result<Option<Student>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call(
                    "getStudent",
                    &[org.into(), account.to_string().into()],
                )?;
                if value.is_null() {
                    return Ok(None);
                }
                let year = wire::ranged_u8(wire::tuple_u64(&value, 3)?, 4, "year out of range")?;
                Ok(Some(Student {
                    organization: org.to_owned(),
                    department: wire::tuple_str(&value, 0)?,
                    account,
                    name: wire::tuple_str(&value, 1)?,
                    roll_no: wire::tuple_str(&value, 2)?,
                    year,
                    section: wire::tuple_str(&value, 4)?,
                    email: wire::tuple_str(&value, 5)?,
                }))
            }
            Backend::Tabular(table) => Ok(table
                .find(|r| r.college_name == org && r.wallet == account)
                .map(row_to_student)),
        }
    }

    /// Students of one department, insertion order preserved.
    pub fn list(&self, org: &str, department: &str) -> Result<Vec<Student>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value =
                    handle.call("getStudents", &[org.into(), department.into()])?;
                let wallets = wire::addresses(&value, 0)?;
                let names = wire::strings(&value, 1)?;
                let roll_nos = wire::strings(&value, 2)?;
                let years = wire::u64s(&value, 3)?;
                let sections = wire::strings(&value, 4)?;
                let emails = wire::strings(&value, 5)?;

                wallets
                    .into_iter()
                    .enumerate()
                    .map(|(i, account)| {
                        Ok(Student {
                            organization: org.to_owned(),
                            department: department.to_owned(),
                            account,
                            name: names.get(i).cloned().unwrap_or_default(),
                            roll_no: roll_nos.get(i).cloned().unwrap_or_default(),
                            year: wire::ranged_u8(
                                years.get(i).copied().unwrap_or(0),
                                4,
                                "year out of range",
                            )?,
                            section: sections.get(i).cloned().unwrap_or_default(),
                            email: emails.get(i).cloned().unwrap_or_default(),
                        })
                    })
                    .collect()
            }
            Backend::Tabular(table) => Ok(table
                .query(|r| r.college_name == org && r.department == department)
                .into_iter()
                .map(row_to_student)
                .collect()),
        }
    }

    pub fn upsert(
        &mut self,
        student: &Student,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(&student.organization)?;
        validate_year(student.year)?;

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    student.organization.clone().into(),
                    student.department.clone().into(),
                    student.account.to_string().into(),
                    student.name.clone().into(),
                    student.roll_no.clone().into(),
                    student.year.into(),
                    student.section.clone().into(),
                    student.email.clone().into(),
                ];
                let tx_id = handle.send(&key, "addStudent", args, gas::ADD_STUDENT)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                if table.exists(|r| {
                    r.college_name == student.organization && r.wallet == student.account
                }) {
                    warn!(org = %student.organization, account = %student.account, "student already exists");
                    return Ok(UpsertOutcome::AlreadyExists);
                }
                table
                    .append(StudentRow {
                        college_name: student.organization.clone(),
                        department: student.department.clone(),
                        wallet: student.account,
                        name: student.name.clone(),
                        roll_no: student.roll_no.clone(),
                        year: student.year,
                        section: student.section.clone(),
                        email: student.email.clone(),
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}

fn row_to_student(r: StudentRow) -> Student {
    Student {
        organization: r.college_name,
        department: r.department,
        account: r.wallet,
        name: r.name,
        roll_no: r.roll_no,
        year: r.year,
        section: r.section,
        email: r.email,
    }
}
