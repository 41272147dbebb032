//! # Tabular Store (fallback backend)
//!
//! One durable, CSV-backed table per entity kind with a fixed column schema
//! declared at open time. A missing backing file is created empty with a
//! header row (not an error). Malformed content is a fatal load error.
//!
//! ## Semantics
//!
//! - `exists` / `query`: linear scans; "not found" is an empty result,
//!   never an error.
//! - `append`: no store-side uniqueness check; callers scan first.
//! - `update_where`: in-place field mutation of the first matching row
//!   (used only for the explicitly mutable fields: salary, points).
//!
//! ## Accepted limitation
//!
//! Mutations rewrite the whole file without locking. Concurrent writers to
//! the same entity kind from different sessions can lose updates (last
//! writer wins).

pub mod records;
pub mod table;

pub use records::{
    DepartmentRow, FacultyRow, GradeRow, PointsRow, ReportRow, SalaryRow, ScholarshipRow,
    StaffRow, StudentRow,
};
pub use table::{CsvTable, StoreError, TableRecord};
