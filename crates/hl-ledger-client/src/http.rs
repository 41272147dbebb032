//! # HTTP Ledger Client
//!
//! Blocking JSON-RPC transport to the remote ledger node. All calls run
//! inline and suspend the interaction until complete; the request timeout
//! below is the only bound enforced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::Address;
use tracing::{debug, warn};

use crate::errors::LedgerError;
use crate::ports::{LedgerTransport, TxId};
use crate::rpc::{JsonRpcRequest, JsonRpcResponse};
use crate::tx::SignedTransaction;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Blocking HTTP client for the ledger node's JSON-RPC endpoint.
pub struct HttpLedgerClient {
    client: reqwest::blocking::Client,
    base_url: String,
    request_id: AtomicU64,
}

impl HttpLedgerClient {
    /// Build a client against `base_url` (e.g. `http://127.0.0.1:8545`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, LedgerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    fn rpc<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<R, LedgerError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());
        debug!(method, url = %self.base_url, "ledger rpc");

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    LedgerError::Unreachable(format!("cannot reach {}: {e}", self.base_url))
                } else {
                    LedgerError::Transport(e.to_string())
                }
            })?;

        let parsed: JsonRpcResponse<R> = response
            .json()
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        parsed.into_result()
    }
}

impl LedgerTransport for HttpLedgerClient {
    fn probe_liveness(&self) -> bool {
        match self.rpc::<_, bool>("ledger_ping", json!([])) {
            Ok(alive) => alive,
            Err(e) => {
                warn!(error = %e, "liveness probe failed");
                false
            }
        }
    }

    fn call(&self, contract: Address, method: &str, args: &[Value]) -> Result<Value, LedgerError> {
        self.rpc(
            "ledger_call",
            json!({
                "contract": contract.to_string(),
                "method": method,
                "args": args,
            }),
        )
    }

    fn sequence_number(&self, account: &Address) -> Result<u64, LedgerError> {
        self.rpc("ledger_sequence", json!({ "account": account.to_string() }))
    }

    fn submit(&self, tx: &SignedTransaction) -> Result<TxId, LedgerError> {
        self.rpc("ledger_submit", json!({ "tx": tx }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_against_unbound_port_is_false_not_panic() {
        // Port 9 (discard) is a safe never-listening target.
        let client = HttpLedgerClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.probe_liveness());
    }

    #[test]
    fn call_against_unbound_port_is_a_distinct_error() {
        let client = HttpLedgerClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .call(
                Address::from_bytes([0x22; 20]),
                "getPoints",
                &["Acme".into()],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Unreachable(_) | LedgerError::Transport(_)
        ));
    }
}
