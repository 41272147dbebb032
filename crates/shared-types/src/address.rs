//! # Account Address Codec
//!
//! Validates and canonicalizes 20-byte account identifiers.
//!
//! Accepted input forms:
//!
//! - all-lowercase or all-uppercase 40 hex digits, with or without `0x`
//! - mixed-case 40 hex digits, which MUST carry a valid Keccak-256
//!   checksum (EIP-55 style); a wrong-case digit is rejected
//!
//! Parsing has no side effects; `Display` renders the checksummed form.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Errors produced while parsing an account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is not 40 hex digits long (after stripping `0x`).
    #[error("invalid address length: expected 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// Input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {0:?} in address")]
    InvalidCharacter(char),

    /// Mixed-case input whose casing does not match its checksum.
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A validated 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Parse and canonicalize a raw account string.
    ///
    /// Case-insensitive unless the input is mixed-case, in which case the
    /// Keccak checksum encoded in the casing is verified.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let stripped = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);

        if stripped.len() != 40 {
            return Err(AddressError::InvalidLength(stripped.len()));
        }
        if let Some(bad) = stripped.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidCharacter(bad));
        }

        let mut bytes = [0u8; 20];
        // Charset already validated, so this cannot fail.
        hex::decode_to_slice(stripped.to_ascii_lowercase(), &mut bytes)
            .map_err(|_| AddressError::InvalidLength(stripped.len()))?;

        let addr = Self(bytes);

        let has_lower = stripped.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = stripped.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && stripped != addr.checksum_hex() {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(addr)
    }

    /// Construct from raw bytes (already validated elsewhere, e.g. derived
    /// from a public key).
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw 20-byte form.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Checksummed hex digits without the `0x` prefix.
    ///
    /// A digit is uppercased when the corresponding nibble of the Keccak-256
    /// hash of the lowercase hex form is >= 8.
    fn checksum_hex(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        lower
            .char_indices()
            .map(|(i, c)| {
                let nibble = if i % 2 == 0 {
                    hash[i / 2] >> 4
                } else {
                    hash[i / 2] & 0x0f
                };
                if nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    /// Case-insensitive equality against a raw, possibly unvalidated string.
    pub fn matches(&self, raw: &str) -> bool {
        Self::parse(raw).map_or(false, |other| other == *self)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.checksum_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as the checksummed string so CSV rows and JSON payloads carry
// the same canonical form.
impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
