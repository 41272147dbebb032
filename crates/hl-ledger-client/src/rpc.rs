//! # JSON-RPC 2.0 Envelopes
//!
//! Request/response wire types for the ledger node's RPC endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
    pub id: u64,
}

impl<P: Serialize> JsonRpcRequest<P> {
    /// Wrap `params` for the given method.
    pub fn new(method: &'static str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// A JSON-RPC 2.0 response carrying either a result or an error.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

impl<R: DeserializeOwned> JsonRpcResponse<R> {
    /// Collapse into the result, treating a missing result as a decode
    /// failure rather than an empty value.
    pub fn into_result(self) -> Result<R, crate::LedgerError> {
        if let Some(error) = self.error {
            return Err(crate::LedgerError::Rejected(error.to_string()));
        }
        self.result
            .ok_or_else(|| crate::LedgerError::Decode("missing result in response".into()))
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_version_tag() {
        let req = JsonRpcRequest::new("ledger_ping", (), 7);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "ledger_ping");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn error_response_becomes_rejection() {
        let resp: JsonRpcResponse<u64> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"revert"},"id":1}"#,
        )
        .unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(err.to_string().contains("revert"));
    }

    #[test]
    fn missing_result_is_a_decode_failure() {
        let resp: JsonRpcResponse<u64> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            resp.into_result(),
            Err(crate::LedgerError::Decode(_))
        ));
    }
}
