//! # Submitter Keys
//!
//! Private-key parsing, public-account derivation and transaction signing.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Key bytes zeroized after parsing
//!
//! The public account is derived Ethereum-style: Keccak-256 of the
//! uncompressed public key (without the SEC1 tag byte), last 20 bytes.

use k256::ecdsa::{signature::Signer, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use shared_types::Address;
use zeroize::Zeroize;

use crate::errors::LedgerError;

/// A submitter's private signing key.
///
/// Consumed once per write operation; parse failures reject the operation
/// before any backend call.
pub struct PrivateKey {
    signing: SigningKey,
}

impl PrivateKey {
    /// Parse a 64-hex-digit private key, with or without a `0x` prefix.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let stripped = raw
            .trim()
            .strip_prefix("0x")
            .or_else(|| raw.trim().strip_prefix("0X"))
            .unwrap_or_else(|| raw.trim());

        if stripped.len() != 64 {
            return Err(LedgerError::InvalidKey);
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(stripped, &mut bytes).map_err(|_| LedgerError::InvalidKey)?;
        let signing = SigningKey::from_slice(&bytes).map_err(|_| LedgerError::InvalidKey)?;
        bytes.zeroize();

        Ok(Self { signing })
    }

    /// Derive the submitter's public account address.
    pub fn address(&self) -> Address {
        let verifying = self.signing.verifying_key();
        derive_address(&verifying.to_encoded_point(false).as_bytes()[1..])
    }

    /// Compressed SEC1 public key, hex-encoded. Shipped with each signed
    /// transaction so the remote can verify without a registry lookup.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing.verifying_key().to_encoded_point(true).as_bytes())
    }

    /// Sign `message` (RFC 6979 deterministic ECDSA over secp256k1).
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signature: Signature = self.signing.sign(message);
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        out
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "PrivateKey({})", self.address())
    }
}

/// Keccak-256 of an uncompressed public key body, last 20 bytes.
pub(crate) fn derive_address(uncompressed_pubkey_body: &[u8]) -> Address {
    let digest = Keccak256::digest(uncompressed_pubkey_body);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..32]);
    Address::from_bytes(bytes)
}
