//! # Health Report Accessor
//!
//! Append-only, multiple reports per student. Submission fixes the
//! summary into a Keccak-256 digest so the stored record carries a
//! fixed-length fingerprint rather than free text.

use std::time::{SystemTime, UNIX_EPOCH};

use hl_ledger_client::{gas, LedgerTransport};
use hl_tabular_store::ReportRow;
use serde_json::Value;
use sha3::{Digest, Keccak256};
use shared_types::{AccessError, Address, HealthReport, UpsertOutcome};

use super::{parse_key, require_org, store_err, wire, Backend};
use crate::session::Session;

pub struct HealthReportAccessor<T: LedgerTransport> {
    backend: Backend<T, ReportRow>,
}

impl<T: LedgerTransport> HealthReportAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Result<Self, AccessError> {
        Ok(Self {
            backend: Backend::bind(session, session.config.clinic_contract)?,
        })
    }

    /// Every report filed by an organization, insertion order preserved.
    pub fn list(&self, org: &str) -> Result<Vec<HealthReport>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call("getAllReports", &[org.into()])?;
                decode_reports(org, &value)
            }
            Backend::Tabular(table) => Ok(table
                .query(|r| r.hospital_name == org)
                .into_iter()
                .map(row_to_report)
                .collect()),
        }
    }

    /// Reports for one student only.
    pub fn list_for_student(
        &self,
        org: &str,
        student: Address,
    ) -> Result<Vec<HealthReport>, AccessError> {
        require_org(org)?;
        match &self.backend {
            Backend::Ledger(handle) => {
                let value = handle.call(
                    "getStudentReports",
                    &[org.into(), student.to_string().into()],
                )?;
                decode_reports(org, &value)
            }
            Backend::Tabular(table) => Ok(table
                .query(|r| r.hospital_name == org && r.student_address == student)
                .into_iter()
                .map(row_to_report)
                .collect()),
        }
    }

    /// File a report and award its points. `summary` is digested here;
    /// only the digest is persisted.
    pub fn submit(
        &mut self,
        org: &str,
        student: Address,
        content_locator: &str,
        points: u64,
        summary: &str,
        credential: &str,
    ) -> Result<UpsertOutcome, AccessError> {
        require_org(org)?;
        if content_locator.trim().is_empty() {
            return Err(AccessError::Validation {
                field: "content_locator",
                reason: "must not be empty".into(),
            });
        }

        let digest = hex::encode(Keccak256::digest(summary.as_bytes()));

        match &mut self.backend {
            Backend::Ledger(handle) => {
                let key = parse_key(credential)?;
                let args: Vec<Value> = vec![
                    org.into(),
                    student.to_string().into(),
                    content_locator.into(),
                    points.into(),
                    digest.into(),
                ];
                let tx_id =
                    handle.send(&key, "submitHealthReport", args, gas::SUBMIT_HEALTH_REPORT)?;
                Ok(UpsertOutcome::Submitted(tx_id.to_string()))
            }
            Backend::Tabular(table) => {
                table
                    .append(ReportRow {
                        hospital_name: org.to_owned(),
                        student_address: student,
                        cid: content_locator.to_owned(),
                        timestamp: now_unix(),
                        points,
                        summary_hash: digest,
                    })
                    .map_err(store_err)?;
                Ok(UpsertOutcome::Stored)
            }
        }
    }
}

fn decode_reports(org: &str, value: &Value) -> Result<Vec<HealthReport>, AccessError> {
    let tuples = value.as_array().ok_or_else(|| {
        AccessError::Connectivity("unexpected ledger response shape: expected report list".into())
    })?;

    tuples
        .iter()
        .map(|tuple| {
            Ok(HealthReport {
                organization: org.to_owned(),
                student: wire::tuple_address(tuple, 0)?,
                content_locator: wire::tuple_str(tuple, 1)?,
                timestamp: wire::tuple_u64(tuple, 2)?,
                points: wire::tuple_u64(tuple, 3)?,
                summary_digest: wire::tuple_str(tuple, 4)?,
            })
        })
        .collect()
}

fn row_to_report(r: ReportRow) -> HealthReport {
    HealthReport {
        organization: r.hospital_name,
        student: r.student_address,
        content_locator: r.cid,
        timestamp: r.timestamp,
        points: r.points,
        summary_digest: r.summary_hash,
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
