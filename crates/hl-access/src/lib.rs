//! # Hybrid Ledger Access Layer
//!
//! For every read or write, this crate decides which backend answers (the
//! remote ledger, authoritative and transactional, or the local CSV tables,
//! the non-transactional fallback), normalizes results into one record
//! shape, and for ledger writes constructs, signs and submits a
//! sequence-correct transaction.
//!
//! ## Flow
//!
//! ```text
//! caller → Entity Accessor → Backend Selector → { Ledger Client → Tx Builder,
//!                                                 or Tabular Store }
//!                                             → normalized record back
//! ```
//!
//! ## Session model
//!
//! Backend selection happens once per [`Session`], never per field, so a
//! single screen never silently mixes sources mid-interaction. When the
//! ledger is unreachable the session runs degraded: reads fall back to the
//! tables and ledger-only writes are rejected outright instead of silently
//! no-opped.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use hl_access::{AccessConfig, Session};
//! use hl_ledger_client::HttpLedgerClient;
//!
//! # fn main() -> Result<(), shared_types::AccessError> {
//! let config = AccessConfig::from_env()?;
//! let transport = Arc::new(
//!     HttpLedgerClient::new(config.node_url.clone())
//!         .map_err(|e| shared_types::AccessError::Connectivity(e.to_string()))?,
//! );
//! let session = Session::open(config, transport)?;
//!
//! let departments = session.departments()?.list("Acme College")?;
//! # let _ = departments;
//! # Ok(())
//! # }
//! ```

pub mod accessors;
pub mod config;
pub mod selector;
pub mod session;

pub use accessors::department::DepartmentAccessor;
pub use accessors::faculty::FacultyAccessor;
pub use accessors::grades::GradeAccessor;
pub use accessors::health_report::HealthReportAccessor;
pub use accessors::points::PointsAccessor;
pub use accessors::registry::RegistryAccessor;
pub use accessors::salary::SalaryAccessor;
pub use accessors::scholarship::ScholarshipAccessor;
pub use accessors::staff::StaffAccessor;
pub use accessors::student::StudentAccessor;
pub use config::AccessConfig;
pub use selector::{BackendSelector, Selection};
pub use session::Session;

// Re-export the caller-facing vocabulary so downstream consumers only need
// this crate.
pub use shared_types::{
    AccessError, Address, BackendKind, BackendMode, RedeemOutcome, UpsertOutcome,
};
