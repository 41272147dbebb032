//! # Transaction Builder/Signer
//!
//! Converts a pending contract call into a signed, fee-priced transaction
//! bound to the submitter's next sequence number, and submits it.
//!
//! The sequence number is read immediately before signing, inside the same
//! logical operation. Two concurrent builds for the same submitter that do
//! not observe each other's effect will collide and the remote rejects the
//! second; this layer does not serialize concurrent submitters (accepted
//! limitation: single submitter per account assumed).

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::{Digest, Keccak256};
use shared_types::Address;
use tracing::{debug, info};

use crate::errors::LedgerError;
use crate::keys::PrivateKey;
use crate::ports::{LedgerTransport, TxId};

/// Fixed fee price: 2 gwei per gas unit.
pub const DEFAULT_GAS_PRICE_WEI: u64 = 2_000_000_000;

/// Gas ceilings per contract method, matching the deployed contracts.
pub mod gas {
    pub const REGISTER_ORGANIZATION: u64 = 350_000;
    pub const ADD_DEPARTMENT: u64 = 350_000;
    pub const ADD_FACULTY: u64 = 300_000;
    pub const ADD_STUDENT: u64 = 300_000;
    pub const ADD_MARKS: u64 = 200_000;
    pub const ADD_STAFF: u64 = 350_000;
    pub const SET_SALARY: u64 = 250_000;
    pub const SUBMIT_HEALTH_REPORT: u64 = 450_000;
    pub const REDEEM_POINTS: u64 = 150_000;
}

/// The unsigned transaction body. Its canonical JSON bytes are what gets
/// hashed and signed, so field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    /// Submitter account, derived from the signing key.
    pub from: Address,
    /// Target contract.
    pub contract: Address,
    /// Contract method name.
    pub method: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// The submitter's next sequence number at build time.
    pub sequence: u64,
    /// Gas ceiling for this call.
    pub gas_limit: u64,
    /// Fee per gas unit, in wei.
    pub gas_price: U256,
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed body.
    pub payload: UnsignedTransaction,
    /// Keccak-256 of the canonical payload bytes, hex.
    pub hash: String,
    /// ECDSA signature (r||s), hex.
    pub signature: String,
    /// Compressed SEC1 public key of the submitter, hex.
    pub public_key: String,
}

impl SignedTransaction {
    /// The canonical bytes the signature covers.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        canonical_bytes(&self.payload)
    }
}

fn canonical_bytes(payload: &UnsignedTransaction) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(payload).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Builds, signs and submits transactions over a [`LedgerTransport`].
pub struct TxBuilder<'a, T: LedgerTransport> {
    transport: &'a T,
    gas_price: U256,
}

impl<'a, T: LedgerTransport> TxBuilder<'a, T> {
    /// Builder with the fixed default fee price.
    pub fn new(transport: &'a T) -> Self {
        Self::with_gas_price(transport, U256::from(DEFAULT_GAS_PRICE_WEI))
    }

    /// Builder with a caller-supplied fee price.
    pub fn with_gas_price(transport: &'a T, gas_price: U256) -> Self {
        Self {
            transport,
            gas_price,
        }
    }

    /// Build, sign and submit one state-changing call.
    ///
    /// Fails as a whole on any step (bad key, unreachable node, remote
    /// rejection) with nothing submitted unless fully constructed and
    /// signed. Returns the remote transaction id.
    pub fn send(
        &self,
        key: &PrivateKey,
        contract: Address,
        method: &str,
        args: Vec<Value>,
        gas_limit: u64,
    ) -> Result<TxId, LedgerError> {
        let from = key.address();

        // Read the sequence number as late as possible, immediately before
        // signing. See module docs for the concurrent-submitter caveat.
        let sequence = self.transport.sequence_number(&from)?;
        debug!(%from, method, sequence, "building transaction");

        let payload = UnsignedTransaction {
            from,
            contract,
            method: method.to_owned(),
            args,
            sequence,
            gas_limit,
            gas_price: self.gas_price,
        };

        let bytes = canonical_bytes(&payload)?;
        let hash = hex::encode(Keccak256::digest(&bytes));
        let signature = hex::encode(key.sign(&bytes));

        let signed = SignedTransaction {
            payload,
            hash,
            signature,
            public_key: key.public_key_hex(),
        };

        let tx_id = self.transport.submit(&signed)?;
        info!(%from, method, %tx_id, "transaction submitted");
        Ok(tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn contract() -> Address {
        Address::from_bytes([0x22; 20])
    }

    #[test]
    fn send_consumes_sequence_numbers_in_order() {
        let ledger = InMemoryLedger::new();
        let key = PrivateKey::parse(KEY).unwrap();
        let builder = TxBuilder::new(&ledger);

        builder
            .send(
                &key,
                contract(),
                "registerCollege",
                vec!["Acme College".into()],
                gas::REGISTER_ORGANIZATION,
            )
            .unwrap();
        builder
            .send(
                &key,
                contract(),
                "registerHospital",
                vec!["General".into()],
                gas::REGISTER_ORGANIZATION,
            )
            .unwrap();

        assert_eq!(ledger.sequence_number(&key.address()).unwrap(), 2);
    }

    #[test]
    fn stale_sequence_is_rejected_verbatim() {
        let ledger = InMemoryLedger::new();
        let key = PrivateKey::parse(KEY).unwrap();
        let builder = TxBuilder::new(&ledger);

        let first = builder
            .send(
                &key,
                contract(),
                "registerCollege",
                vec!["Acme College".into()],
                gas::REGISTER_ORGANIZATION,
            )
            .unwrap();

        // Replay the very same signed transaction: its sequence is stale now.
        let replay = ledger.last_submitted().unwrap();
        assert_eq!(TxId(replay.hash.clone()), first);
        let err = ledger.submit(&replay).unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let ledger = InMemoryLedger::new();
        let key = PrivateKey::parse(KEY).unwrap();
        let builder = TxBuilder::new(&ledger);
        builder
            .send(
                &key,
                contract(),
                "registerCollege",
                vec!["Acme College".into()],
                gas::REGISTER_ORGANIZATION,
            )
            .unwrap();

        let mut tampered = ledger.last_submitted().unwrap();
        tampered.payload.args = vec!["Evil College".into()];
        tampered.payload.sequence = 1;
        let err = ledger.submit(&tampered).unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
    }

    #[test]
    fn unreachable_node_fails_the_whole_operation() {
        let ledger = InMemoryLedger::new();
        ledger.set_reachable(false);
        let key = PrivateKey::parse(KEY).unwrap();
        let builder = TxBuilder::new(&ledger);

        let err = builder
            .send(
                &key,
                contract(),
                "registerCollege",
                vec!["Acme College".into()],
                gas::REGISTER_ORGANIZATION,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unreachable(_)));
        assert!(ledger.last_submitted().is_none());
    }

    #[test]
    fn payload_hash_is_stable() {
        let payload = UnsignedTransaction {
            from: Address::from_bytes([1; 20]),
            contract: contract(),
            method: "addMarks".into(),
            args: vec!["Acme College".into()],
            sequence: 3,
            gas_limit: gas::ADD_MARKS,
            gas_price: U256::from(DEFAULT_GAS_PRICE_WEI),
        };
        let a = canonical_bytes(&payload).unwrap();
        let b = canonical_bytes(&payload.clone()).unwrap();
        assert_eq!(a, b);
    }
}
