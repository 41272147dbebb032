//! # Row Schemas
//!
//! One row type per entity kind, bound to its backing file and header row.
//! Column names stay camelCase on disk so existing fallback files keep
//! loading. Numeric columns round-trip through plain text; addresses are
//! stored in checksummed form and compared case-insensitively via
//! [`Address`] equality.

use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::table::TableRecord;

/// `departments.csv`: natural key (collegeName, deptName).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRow {
    pub college_name: String,
    pub dept_name: String,
    pub dept_admin: Address,
}

impl TableRecord for DepartmentRow {
    const FILE_STEM: &'static str = "departments";
    const COLUMNS: &'static [&'static str] = &["collegeName", "deptName", "deptAdmin"];
}

/// `faculty.csv`: natural key (collegeName, deptName, wallet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRow {
    pub college_name: String,
    pub dept_name: String,
    pub wallet: Address,
    pub name: String,
    pub role: String,
}

impl TableRecord for FacultyRow {
    const FILE_STEM: &'static str = "faculty";
    const COLUMNS: &'static [&'static str] = &["collegeName", "deptName", "wallet", "name", "role"];
}

/// `students.csv`: natural key (collegeName, wallet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub college_name: String,
    pub department: String,
    pub wallet: Address,
    pub name: String,
    pub roll_no: String,
    pub year: u8,
    pub section: String,
    pub email: String,
}

impl TableRecord for StudentRow {
    const FILE_STEM: &'static str = "students";
    const COLUMNS: &'static [&'static str] = &[
        "collegeName",
        "department",
        "wallet",
        "name",
        "rollNo",
        "year",
        "section",
        "email",
    ];
}

/// `grades.csv`: no uniqueness beyond the natural key; duplicates append
/// and re-queries observe insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRow {
    pub college_name: String,
    pub student_wallet: Address,
    pub subject: String,
    pub marks: u8,
}

impl TableRecord for GradeRow {
    const FILE_STEM: &'static str = "grades";
    const COLUMNS: &'static [&'static str] =
        &["collegeName", "studentWallet", "subject", "marks"];
}

/// `staff.csv`: natural key (hospitalName, staffAddress).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRow {
    pub hospital_name: String,
    pub staff_address: Address,
    pub staff_name: String,
    pub staff_role: String,
}

impl TableRecord for StaffRow {
    const FILE_STEM: &'static str = "staff";
    const COLUMNS: &'static [&'static str] =
        &["hospitalName", "staffAddress", "staffName", "staffRole"];
}

/// `salary.csv`: mutable in place; one row per staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRow {
    pub hospital_name: String,
    pub staff_address: Address,
    /// Smallest monetary unit; u128 covers any realistic salary and keeps
    /// the column plain decimal text.
    pub salary_wei: u128,
}

impl TableRecord for SalaryRow {
    const FILE_STEM: &'static str = "salary";
    const COLUMNS: &'static [&'static str] = &["hospitalName", "staffAddress", "salaryWei"];
}

/// `reports.csv`: append-only, multiple per student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub hospital_name: String,
    pub student_address: Address,
    pub cid: String,
    pub timestamp: u64,
    pub points: u64,
    pub summary_hash: String,
}

impl TableRecord for ReportRow {
    const FILE_STEM: &'static str = "reports";
    const COLUMNS: &'static [&'static str] = &[
        "hospitalName",
        "studentAddress",
        "cid",
        "timestamp",
        "points",
        "summaryHash",
    ];
}

/// `points.csv`: mutable in place; reset to zero on redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRow {
    pub college_name: String,
    pub wallet: Address,
    pub points: u64,
}

impl TableRecord for PointsRow {
    const FILE_STEM: &'static str = "points";
    const COLUMNS: &'static [&'static str] = &["collegeName", "wallet", "points"];
}

/// `scholarships.csv`: read-only from this layer; no write path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRow {
    pub college_name: String,
    pub wallet: Address,
    pub amount: u128,
}

impl TableRecord for ScholarshipRow {
    const FILE_STEM: &'static str = "scholarships";
    const COLUMNS: &'static [&'static str] = &["collegeName", "wallet", "amount"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CsvTable;
    use tempfile::TempDir;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn department_round_trip() {
        let dir = TempDir::new().unwrap();
        let row = DepartmentRow {
            college_name: "Acme College".into(),
            dept_name: "CS".into(),
            dept_admin: addr(0x11),
        };
        {
            let mut table: CsvTable<DepartmentRow> = CsvTable::open(dir.path()).unwrap();
            table.append(row.clone()).unwrap();
        }
        let table: CsvTable<DepartmentRow> = CsvTable::open(dir.path()).unwrap();
        assert_eq!(table.find(|r| r.dept_name == "CS"), Some(row));
    }

    #[test]
    fn header_row_matches_declared_columns() {
        let dir = TempDir::new().unwrap();
        let mut table: CsvTable<StudentRow> = CsvTable::open(dir.path()).unwrap();
        table
            .append(StudentRow {
                college_name: "Acme College".into(),
                department: "CS".into(),
                wallet: addr(0xaa),
                name: "Jo".into(),
                roll_no: "R-7".into(),
                year: 2,
                section: "A".into(),
                email: "jo@acme.edu".into(),
            })
            .unwrap();

        let content = std::fs::read_to_string(table.path()).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, StudentRow::COLUMNS.join(","));
    }

    #[test]
    fn salary_survives_large_amounts() {
        let dir = TempDir::new().unwrap();
        let big = 2_000_000_000_000_000_000_000_000_000u128;
        {
            let mut table: CsvTable<SalaryRow> = CsvTable::open(dir.path()).unwrap();
            table
                .append(SalaryRow {
                    hospital_name: "General".into(),
                    staff_address: addr(0x22),
                    salary_wei: big,
                })
                .unwrap();
        }
        let table: CsvTable<SalaryRow> = CsvTable::open(dir.path()).unwrap();
        assert_eq!(table.find(|_| true).unwrap().salary_wei, big);
    }
}
