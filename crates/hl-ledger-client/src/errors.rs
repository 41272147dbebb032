//! # Ledger Error Types

use thiserror::Error;

/// Errors that can occur when talking to the remote ledger.
///
/// `Unreachable`, `Transport` and `Decode` are connectivity-class failures;
/// `Rejected` is a terminal remote-side refusal and is surfaced verbatim.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Liveness probe or connection establishment failed.
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    /// An established connection failed mid-request.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote answered but the payload did not decode to the expected
    /// shape. Reported distinctly: an undecodable answer is not "no data".
    #[error("failed to decode ledger response: {0}")]
    Decode(String),

    /// The remote rejected the request (bad signature, insufficient funds,
    /// sequence collision, contract revert). Message passed through as-is.
    #[error("rejected by ledger: {0}")]
    Rejected(String),

    /// A credential string did not parse to a valid signing key.
    #[error("invalid private key format")]
    InvalidKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_passes_through_verbatim() {
        let err = LedgerError::Rejected("sequence collision: expected 4, got 3".into());
        assert_eq!(
            err.to_string(),
            "rejected by ledger: sequence collision: expected 4, got 3"
        );
    }
}
