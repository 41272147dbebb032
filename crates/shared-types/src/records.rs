//! # Normalized Record Entities
//!
//! One struct per entity kind, shared by both backends. The ledger returns
//! parallel arrays and tuples; the tabular fallback returns CSV rows; both
//! are normalized into these shapes before they reach a caller.
//!
//! ## Clusters
//!
//! - **Campus**: `Department`, `Faculty`, `Student`, `Marksheet`,
//!   `Scholarship`, `PointsBalance`
//! - **Clinic**: `StaffMember`, `HealthReport`

use crate::address::Address;
use serde::{Deserialize, Serialize};

// Re-export U256 for monetary amounts (salaries, scholarships) so every
// consumer uses the same numeric type.
pub use primitive_types::U256;

/// An academic department inside one organization.
///
/// Natural key: (organization, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Owning organization, matched exactly (no normalization).
    pub organization: String,
    /// Department name.
    pub name: String,
    /// Account administering this department.
    pub admin: Address,
}

/// A faculty member of a campus department.
///
/// Natural key: (organization, department, account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub organization: String,
    pub department: String,
    /// Faculty account address.
    pub account: Address,
    /// Display name.
    pub name: String,
    /// Open role string ("Professor", "Lab Assistant", ...).
    pub role: String,
}

/// An enrolled student.
///
/// Natural key: (organization, account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub organization: String,
    pub department: String,
    /// Student account address.
    pub account: Address,
    /// Display name.
    pub name: String,
    /// Roll identifier, free-form.
    pub roll_no: String,
    /// Academic year, 1 through 4.
    pub year: u8,
    /// Section label.
    pub section: String,
    /// Contact email, stored verbatim.
    pub email: String,
}

/// A student's grades, subjects and marks in insertion order.
///
/// Parallel arrays mirror the ledger's read shape; `subjects.len()` always
/// equals `marks.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Marksheet {
    pub subjects: Vec<String>,
    /// Integer marks in 0..=100, one per subject.
    pub marks: Vec<u8>,
}

impl Marksheet {
    /// True when no grade has been recorded.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Append one (subject, mark) pair.
    pub fn push(&mut self, subject: String, mark: u8) {
        self.subjects.push(subject);
        self.marks.push(mark);
    }
}

/// A single grade entry as written (one subject, one mark).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub organization: String,
    /// Graded student's account.
    pub student: Address,
    pub subject: String,
    /// Integer mark in 0..=100.
    pub mark: u8,
}

/// A clinic staff member with their current salary.
///
/// Natural key: (organization, account). The salary is the only mutable
/// field; everything else is append-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub organization: String,
    /// Staff account address.
    pub account: Address,
    /// Display name.
    pub name: String,
    /// Open role string ("Doctor", "Nurse", "Office", ...).
    pub role: String,
    /// Salary in the smallest monetary unit. Zero when never set.
    pub salary: U256,
    /// Whether the member is active. The fallback store has no active
    /// column and reports true unconditionally.
    pub active: bool,
}

/// An append-only health report filed for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub organization: String,
    /// Student the report concerns.
    pub student: Address,
    /// Content locator for the report body (e.g. an IPFS CID).
    pub content_locator: String,
    /// Unix timestamp at submission.
    pub timestamp: u64,
    /// Reward points awarded with this report.
    pub points: u64,
    /// Fixed-length hex digest of the report summary (Keccak-256).
    pub summary_digest: String,
}

/// A redeemable, non-negative points balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBalance {
    pub balance: u64,
}

/// A scholarship amount. Read-only from this layer: the fallback store has
/// no write path for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholarship {
    pub amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marksheet_preserves_insertion_order() {
        let mut sheet = Marksheet::default();
        sheet.push("Math".into(), 85);
        sheet.push("Physics".into(), 90);
        assert_eq!(sheet.subjects, vec!["Math", "Physics"]);
        assert_eq!(sheet.marks, vec![85, 90]);
    }

    #[test]
    fn staff_member_serde_round_trip() {
        let member = StaffMember {
            organization: "General Hospital".into(),
            account: Address::from_bytes([0x11; 20]),
            name: "A. Ward".into(),
            role: "Nurse".into(),
            salary: U256::from(1_500_000_000u64),
            active: true,
        };
        let json = serde_json::to_string(&member).unwrap();
        let back: StaffMember = serde_json::from_str(&json).unwrap();
        assert_eq!(back, member);
    }
}
