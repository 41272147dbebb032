//! # Error Taxonomy and Operation Outcomes
//!
//! Every backend failure is converted into [`AccessError`] at the accessor
//! boundary; no transport or filesystem error type crosses it. "Not found"
//! is never an error; reads return `Option`/empty collections.

use thiserror::Error;

/// The backend a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Prefer the ledger; fall back to tabular if unreachable.
    LedgerPreferred,
    /// Use the tabular fallback unconditionally.
    TabularPreferred,
}

/// The backend actually serving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Remote ledger (authoritative, transactional).
    Ledger,
    /// Local CSV tables (fallback, non-transactional).
    Tabular,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Ledger => write!(f, "ledger"),
            BackendKind::Tabular => write!(f, "tabular"),
        }
    }
}

/// Errors surfaced to callers of the access layer.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// Input rejected before any backend call.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The offending field.
        field: &'static str,
        reason: String,
    },

    /// The ledger could not be reached or its answer could not be decoded.
    /// Distinct from a legitimately empty result.
    #[error("ledger connectivity failure: {0}")]
    Connectivity(String),

    /// The remote ledger rejected a submitted transaction (bad signature,
    /// insufficient funds, sequence collision, contract revert). Terminal
    /// for the operation; nothing was written.
    #[error("remote rejection: {0}")]
    RemoteRejection(String),

    /// A fatal tabular-store failure: malformed file content at load time
    /// or a failed rewrite.
    #[error("tabular store failure: {0}")]
    Storage(String),

    /// The operation has no tabular equivalent and the session is degraded.
    #[error("{operation} is unavailable in tabular mode")]
    CapabilityUnavailable {
        /// The rejected operation, e.g. "register organization".
        operation: &'static str,
    },
}

/// Outcome of an upsert.
///
/// A natural-key conflict is a warning-level outcome, not an error: the
/// existing record is left untouched and the caller decides how loudly to
/// report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Stored in the tabular fallback.
    Stored,
    /// Submitted to the ledger; carries the transaction id.
    Submitted(String),
    /// The natural key already exists; no mutation happened.
    AlreadyExists,
}

/// Outcome of redeeming a points balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Balance was positive and has been reset to zero. Carries the number
    /// of points redeemed (tabular) and the transaction id (ledger).
    Redeemed {
        points: u64,
        tx_id: Option<String>,
    },
    /// Balance was zero (or absent); nothing was mutated.
    NothingToRedeem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_field() {
        let err = AccessError::Validation {
            field: "year",
            reason: "must be between 1 and 4".into(),
        };
        assert_eq!(err.to_string(), "invalid year: must be between 1 and 4");
    }

    #[test]
    fn capability_message_names_the_operation() {
        let err = AccessError::CapabilityUnavailable {
            operation: "register organization",
        };
        assert!(err.to_string().contains("register organization"));
        assert!(err.to_string().contains("tabular mode"));
    }
}
