//! # Organization Registry
//!
//! Registration is ledger-only: the fallback tables have no organization
//! table, so a degraded session rejects these outright instead of
//! silently no-opping.

use hl_ledger_client::{gas, LedgerTransport};
use shared_types::{AccessError, BackendKind};

use super::{parse_key, require_org, LedgerHandle};
use crate::session::Session;

pub struct RegistryAccessor<T: LedgerTransport> {
    campus: Option<LedgerHandle<T>>,
    clinic: Option<LedgerHandle<T>>,
}

impl<T: LedgerTransport> RegistryAccessor<T> {
    pub(crate) fn new(session: &Session<T>) -> Self {
        match session.backend() {
            BackendKind::Ledger => Self {
                campus: Some(LedgerHandle::bind(session, session.config.campus_contract)),
                clinic: Some(LedgerHandle::bind(session, session.config.clinic_contract)),
            },
            BackendKind::Tabular => Self {
                campus: None,
                clinic: None,
            },
        }
    }

    /// Register an academic institution. Returns the transaction id.
    pub fn register_campus(&self, name: &str, credential: &str) -> Result<String, AccessError> {
        require_org(name)?;
        let handle = self.campus.as_ref().ok_or(AccessError::CapabilityUnavailable {
            operation: "register organization",
        })?;
        let key = parse_key(credential)?;
        let tx_id = handle.send(
            &key,
            "registerCollege",
            vec![name.into()],
            gas::REGISTER_ORGANIZATION,
        )?;
        Ok(tx_id.to_string())
    }

    /// Register a healthcare institution. Returns the transaction id.
    pub fn register_clinic(&self, name: &str, credential: &str) -> Result<String, AccessError> {
        require_org(name)?;
        let handle = self.clinic.as_ref().ok_or(AccessError::CapabilityUnavailable {
            operation: "register organization",
        })?;
        let key = parse_key(credential)?;
        let tx_id = handle.send(
            &key,
            "registerHospital",
            vec![name.into()],
            gas::REGISTER_ORGANIZATION,
        )?;
        Ok(tx_id.to_string())
    }
}
