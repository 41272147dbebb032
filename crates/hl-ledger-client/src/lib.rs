//! # Ledger Client (authoritative backend)
//!
//! Holds a connection to the remote state machine and exposes the three
//! operations the access layer needs:
//!
//! - `call`: read-only contract invocation, no sequence number
//! - `sequence_number`: the submitter's next expected counter value
//! - `submit`: state-changing, one signed transaction per write
//!
//! Transport and decode failures are *distinct errors*, never silently
//! empty results, so callers can tell "no data" from "call failed".
//!
//! ## Crate Structure
//!
//! - `ports`: the [`LedgerTransport`] port trait
//! - `rpc`: JSON-RPC 2.0 envelopes
//! - `http`: blocking HTTP adapter (production)
//! - `memory`: in-memory ledger adapter (testing)
//! - `keys`: private-key parsing, address derivation, signing
//! - `tx`: transaction builder/signer/submitter

pub mod errors;
pub mod http;
pub mod keys;
pub mod memory;
pub mod ports;
pub mod rpc;
pub mod tx;

pub use errors::LedgerError;
pub use http::HttpLedgerClient;
pub use keys::PrivateKey;
pub use memory::InMemoryLedger;
pub use ports::{LedgerTransport, TxId};
pub use tx::{gas, SignedTransaction, TxBuilder, UnsignedTransaction, DEFAULT_GAS_PRICE_WEI};
