//! # Entity Accessors
//!
//! One accessor per entity kind. Each wraps the session's backend decision
//! and returns normalized records; all backend failures are converted to
//! [`AccessError`] here, so no transport or filesystem error crosses this
//! boundary.

pub mod department;
pub mod faculty;
pub mod grades;
pub mod health_report;
pub mod points;
pub mod registry;
pub mod salary;
pub mod scholarship;
pub mod staff;
pub mod student;
pub(crate) mod wire;

use std::sync::Arc;

use hl_ledger_client::{LedgerError, LedgerTransport, PrivateKey, TxBuilder, TxId};
use hl_tabular_store::{CsvTable, StoreError, TableRecord};
use primitive_types::U256;
use serde_json::Value;
use shared_types::{AccessError, Address, BackendKind};

use crate::session::Session;

/// Convert a ledger failure into the caller-facing taxonomy.
///
/// Connectivity-class failures (unreachable, transport, undecodable
/// response) stay distinct from legitimate emptiness; remote rejections
/// pass through verbatim.
pub(crate) fn ledger_err(e: LedgerError) -> AccessError {
    match e {
        LedgerError::Unreachable(m) | LedgerError::Transport(m) | LedgerError::Decode(m) => {
            AccessError::Connectivity(m)
        }
        LedgerError::Rejected(m) => AccessError::RemoteRejection(m),
        LedgerError::InvalidKey => AccessError::Validation {
            field: "private_key",
            reason: "not a valid 64-hex-digit signing key".into(),
        },
    }
}

pub(crate) fn store_err(e: StoreError) -> AccessError {
    AccessError::Storage(e.to_string())
}

/// Parse a write credential, rejecting before any backend call.
pub(crate) fn parse_key(raw: &str) -> Result<PrivateKey, AccessError> {
    PrivateKey::parse(raw).map_err(ledger_err)
}

/// Organization names match exactly; an empty one can never match and is
/// a caller mistake.
pub(crate) fn require_org(org: &str) -> Result<(), AccessError> {
    if org.trim().is_empty() {
        return Err(AccessError::Validation {
            field: "organization",
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

/// A session-scoped handle to one contract on the ledger.
pub(crate) struct LedgerHandle<T: LedgerTransport> {
    transport: Arc<T>,
    contract: Address,
    gas_price: U256,
}

impl<T: LedgerTransport> LedgerHandle<T> {
    /// Read-only contract call, errors converted at this boundary.
    pub(crate) fn call(&self, method: &str, args: &[Value]) -> Result<Value, AccessError> {
        self.transport
            .call(self.contract, method, args)
            .map_err(ledger_err)
    }

    /// Build, sign and submit one write. The credential is consumed here,
    /// once; any failing step aborts with nothing submitted.
    pub(crate) fn send(
        &self,
        key: &PrivateKey,
        method: &str,
        args: Vec<Value>,
        gas_limit: u64,
    ) -> Result<TxId, AccessError> {
        TxBuilder::with_gas_price(&*self.transport, self.gas_price)
            .send(key, self.contract, method, args, gas_limit)
            .map_err(ledger_err)
    }
}

/// The two shapes an accessor's backend can take. Never both: a session
/// decided once and every accessor follows it.
pub(crate) enum Backend<T: LedgerTransport, R> {
    Ledger(LedgerHandle<T>),
    Tabular(CsvTable<R>),
}

impl<T: LedgerTransport, R: TableRecord> Backend<T, R> {
    /// Bind to the session's backend: a contract handle, or this entity's
    /// own table handle opened fresh for the session.
    pub(crate) fn bind(session: &Session<T>, contract: Address) -> Result<Self, AccessError> {
        match session.backend() {
            BackendKind::Ledger => Ok(Backend::Ledger(LedgerHandle {
                transport: Arc::clone(&session.transport),
                contract,
                gas_price: session.config.gas_price,
            })),
            BackendKind::Tabular => CsvTable::open(&session.config.data_dir)
                .map(Backend::Tabular)
                .map_err(store_err),
        }
    }
}

impl<T: LedgerTransport> LedgerHandle<T> {
    pub(crate) fn bind(session: &Session<T>, contract: Address) -> Self {
        Self {
            transport: Arc::clone(&session.transport),
            contract,
            gas_price: session.config.gas_price,
        }
    }
}
