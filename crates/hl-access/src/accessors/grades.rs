//! # Grade Accessor
//!
//! Grades are an append-only log keyed by (organization, student,
//! subject) with no uniqueness enforced: duplicates append, and a
//! re-query observes insertion order.

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::GradeRow;
use serde_json::Value;
use shared_types::{AccessError, Address, GradeEntry, Marksheet, UpsertOutcome};

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

fn validate_mark(mark: u8) -> Result<(), AccessError> {
    if mark > 100 {
        return Err(AccessError::Validation {
            field: "mark",
            reason: format!("must be between 0 and 100, got {mark}"),
        });
    }
    Ok(())
}

pub struct GradeAccessor<T: LedgerTransport> {
    backend: Backend<T, GradeRow>,
}

impl<T: LedgerTransport> GradeAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.campus_contract)?,
        })
    }

    /// A student's marksheet. Empty (not an error) when nothing is
    /// recorded; a transport failure surfaces distinctly.
    pub fn marks(&self, org: &str, student: Address) -> Result<Marksheet, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call(
                    "getMarks",
                    &[org.into(), student.to_string().into()],
                )?;
                let subjects = wire::strings(&value, 0)?;
                let marks = wire::u64s(&value, 1)?
                    .into_iter()
                    .map(|m| wire::ranged_u8(m, 100, "mark out of range"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Marksheet { subjects, marks })
            }
            Backend::Tabular(table) => {
                let mut sheet = Marksheet::default();
                for row in table.query(|r| r.college_name == org && r.student_wallet == student)
                {
                    sheet.push(row.subject, row.marks);
                }
                Ok(sheet)
            }
        }
    }

    /// Record one (subject, mark) pair for a student.
    pub fn add(
        &mut self,
        entry: &GradeEntry,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(&entry.organization)?;
        validate_mark(entry.mark)?;

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    entry.organization.clone().into(),
                    entry.student.to_string().into(),
                    entry.subject.clone().into(),
                    entry.mark.into(),
                ];
                let tx_id = handle.send(&key, "addMarks", args, gas::ADD_MARKS)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                table
                    .append(GradeRow {
                        college_name: entry.organization.clone(),
                        student_wallet: entry.student,
                        subject: entry.subject.clone(),
                        marks: entry.mark,
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}
