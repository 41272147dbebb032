//! # Ledger Transport Port
//!
//! The interface the access layer requires from any ledger backend.
//!
//! Production: [`HttpLedgerClient`](crate::HttpLedgerClient).
//! Testing: [`InMemoryLedger`](crate::InMemoryLedger).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Address;

use crate::errors::LedgerError;
use crate::tx::SignedTransaction;

/// Identifier of a submitted transaction, as reported by the remote node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxId(pub String);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Abstract interface to the remote state machine.
pub trait LedgerTransport: Send + Sync {
    /// Cheap liveness probe. Checked once per session entry by the backend
    /// selector; this layer never retries per call.
    fn probe_liveness(&self) -> bool;

    /// Read-only contract invocation. No sequence number is consumed.
    ///
    /// A transport or decode failure is an `Err`, never an empty value;
    /// legitimate emptiness comes back as an empty JSON array or `null`.
    fn call(&self, contract: Address, method: &str, args: &[Value]) -> Result<Value, LedgerError>;

    /// The next expected sequence number for `account`.
    fn sequence_number(&self, account: &Address) -> Result<u64, LedgerError>;

    /// Submit a fully constructed, signed transaction.
    fn submit(&self, tx: &SignedTransaction) -> Result<TxId, LedgerError>;
}
