//! # Session Configuration
//!
//! Plain config struct with sane defaults and `HL_*` environment
//! overrides, validated before a session opens.

use std::path::PathBuf;

use primitive_types::U256;
use shared_types::{AccessError, Address, BackendMode};

use hl_ledger_client::DEFAULT_GAS_PRICE_WEI;

// Default deployed contract addresses on a local development node.
const DEFAULT_CAMPUS_CONTRACT: [u8; 20] = [
    0x22, 0x79, 0xb7, 0xa0, 0xa6, 0x7d, 0xb3, 0x72, 0x99, 0x6a, 0x5f, 0xab, 0x50, 0xd9, 0x1e,
    0xaa, 0x73, 0xd2, 0xeb, 0xe6,
];
const DEFAULT_CLINIC_CONTRACT: [u8; 20] = [
    0xa5, 0x13, 0xe6, 0xe4, 0xb8, 0xf2, 0xa9, 0x23, 0xd9, 0x83, 0x04, 0xec, 0x87, 0xf6, 0x43,
    0x53, 0xc4, 0xd5, 0xc8, 0x53,
];

/// Configuration for one access-layer session.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Ledger node RPC endpoint.
    pub node_url: String,
    /// Deployed campus-domain contract.
    pub campus_contract: Address,
    /// Deployed clinic-domain contract.
    pub clinic_contract: Address,
    /// Directory holding the fallback CSV tables.
    pub data_dir: PathBuf,
    /// Requested backend mode.
    pub mode: BackendMode,
    /// Fee per gas unit for ledger writes, in wei.
    pub gas_price: U256,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            node_url: "http://127.0.0.1:8545".into(),
            campus_contract: Address::from_bytes(DEFAULT_CAMPUS_CONTRACT),
            clinic_contract: Address::from_bytes(DEFAULT_CLINIC_CONTRACT),
            data_dir: PathBuf::from("."),
            mode: BackendMode::LedgerPreferred,
            gas_price: U256::from(DEFAULT_GAS_PRICE_WEI),
        }
    }
}

impl AccessConfig {
    /// Defaults overlaid with `HL_*` environment variables:
    /// `HL_NODE_URL`, `HL_DATA_DIR`, `HL_MODE` (`ledger`|`tabular`),
    /// `HL_CAMPUS_CONTRACT`, `HL_CLINIC_CONTRACT`, `HL_GAS_PRICE_WEI`.
    pub fn from_env() -> Result<Self, AccessError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HL_NODE_URL") {
            config.node_url = url;
        }
        if let Ok(dir) = std::env::var("HL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(mode) = std::env::var("HL_MODE") {
            config.mode = match mode.to_ascii_lowercase().as_str() {
                "ledger" => BackendMode::LedgerPreferred,
                "tabular" => BackendMode::TabularPreferred,
                other => {
                    return Err(AccessError::Validation {
                        field: "HL_MODE",
                        reason: format!("expected 'ledger' or 'tabular', got {other:?}"),
                    })
                }
            };
        }
        if let Ok(raw) = std::env::var("HL_CAMPUS_CONTRACT") {
            config.campus_contract = parse_contract("HL_CAMPUS_CONTRACT", &raw)?;
        }
        if let Ok(raw) = std::env::var("HL_CLINIC_CONTRACT") {
            config.clinic_contract = parse_contract("HL_CLINIC_CONTRACT", &raw)?;
        }
        if let Ok(raw) = std::env::var("HL_GAS_PRICE_WEI") {
            let wei: u64 = raw.parse().map_err(|_| AccessError::Validation {
                field: "HL_GAS_PRICE_WEI",
                reason: format!("not an integer: {raw:?}"),
            })?;
            config.gas_price = U256::from(wei);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot serve a session.
    pub fn validate(&self) -> Result<(), AccessError> {
        if self.node_url.trim().is_empty() {
            return Err(AccessError::Validation {
                field: "node_url",
                reason: "must not be empty".into(),
            });
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(AccessError::Validation {
                field: "data_dir",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn parse_contract(field: &'static str, raw: &str) -> Result<Address, AccessError> {
    Address::parse(raw).map_err(|e| AccessError::Validation {
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        AccessConfig::default().validate().unwrap();
    }

    #[test]
    fn default_contracts_round_trip_their_checksums() {
        let config = AccessConfig::default();
        assert_eq!(
            config.campus_contract.to_string(),
            "0x2279B7A0a67DB372996a5FaB50D91eAA73d2eBe6"
        );
        assert_eq!(
            config.clinic_contract.to_string(),
            "0xa513E6E4b8f2a923D98304ec87F64353C4D5C853"
        );
    }

    #[test]
    fn empty_node_url_is_rejected() {
        let config = AccessConfig {
            node_url: "  ".into(),
            ..AccessConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AccessError::Validation { field: "node_url", .. })
        ));
    }
}
