//! # Session
//!
//! A session owns the backend decision and hands out entity accessors that
//! all honor it. Each accessor acquires its own store handle at creation;
//! there is no process-wide shared table state.

use std::sync::Arc;

use hl_ledger_client::LedgerTransport;
use shared_types::{AccessError, BackendKind};
use tracing::info;

use crate::accessors::department::DepartmentAccessor;
use crate::accessors::faculty::FacultyAccessor;
use crate::accessors::grades::GradeAccessor;
use crate::accessors::health_report::HealthReportAccessor;
use crate::accessors::points::PointsAccessor;
use crate::accessors::registry::RegistryAccessor;
use crate::accessors::salary::SalaryAccessor;
use crate::accessors::scholarship::ScholarshipAccessor;
use crate::accessors::staff::StaffAccessor;
use crate::accessors::student::StudentAccessor;
use crate::config::AccessConfig;
use crate::selector::{BackendSelector, Selection};

/// One user interaction's view of the system.
///
/// The backend is selected exactly once, at open. Every accessor created
/// from this session serves from that same backend.
pub struct Session<T: LedgerTransport> {
    pub(crate) config: AccessConfig,
    pub(crate) transport: Arc<T>,
    selection: Selection,
}

impl<T: LedgerTransport> Session<T> {
    /// Validate the config, select the backend (probing the ledger at most
    /// once) and open the session.
    pub fn open(config: AccessConfig, transport: Arc<T>) -> Result<Self, AccessError> {
        config.validate()?;

        let selection = BackendSelector::new(config.mode).select(&*transport);
        info!(
            backend = %selection.kind,
            degraded = selection.degraded,
            "session opened"
        );

        Ok(Self {
            config,
            transport,
            selection,
        })
    }

    /// The memoized backend decision.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The backend serving this session.
    pub fn backend(&self) -> BackendKind {
        self.selection.kind
    }

    /// True when the ledger was preferred but unreachable; ledger-only
    /// writes will be rejected with a capability-unavailable outcome.
    pub fn is_degraded(&self) -> bool {
        self.selection.degraded
    }

    /// Organization registration (ledger-only).
    pub fn registry(&self) -> RegistryAccessor<T> {
        RegistryAccessor::new(self)
    }

    pub fn departments(&self) -> Result<DepartmentAccessor<T>, AccessError> {
        DepartmentAccessor::new(self)
    }

    pub fn faculty(&self) -> Result<FacultyAccessor<T>, AccessError> {
        FacultyAccessor::new(self)
    }

    pub fn students(&self) -> Result<StudentAccessor<T>, AccessError> {
        StudentAccessor::new(self)
    }

    pub fn grades(&self) -> Result<GradeAccessor<T>, AccessError> {
        GradeAccessor::new(self)
    }

    pub fn staff(&self) -> Result<StaffAccessor<T>, AccessError> {
        StaffAccessor::new(self)
    }

    pub fn salaries(&self) -> Result<SalaryAccessor<T>, AccessError> {
        SalaryAccessor::new(self)
    }

    pub fn health_reports(&self) -> Result<HealthReportAccessor<T>, AccessError> {
        HealthReportAccessor::new(self)
    }

    pub fn points(&self) -> Result<PointsAccessor<T>, AccessError> {
        PointsAccessor::new(self)
    }

    pub fn scholarships(&self) -> Result<ScholarshipAccessor<T>, AccessError> {
        ScholarshipAccessor::new(self)
    }
}
