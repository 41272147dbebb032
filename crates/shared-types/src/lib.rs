//! # Shared Types Crate
//!
//! This crate contains the account address codec, the normalized record
//! entities for both record domains (campus and clinic), and the error
//! taxonomy every backend converts into.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: callers see one record shape per entity
//!   kind, whether the ledger or the tabular fallback produced it.
//! - **Errors converted at the boundary**: no transport or filesystem error
//!   type escapes the access layer; everything maps to [`AccessError`].

pub mod address;
pub mod errors;
pub mod records;

pub use address::{Address, AddressError};
pub use errors::{AccessError, BackendKind, BackendMode, RedeemOutcome, UpsertOutcome};
pub use records::*;
