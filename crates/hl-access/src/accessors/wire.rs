//! # Ledger Response Decoding
//!
//! The contract surface returns structured tuples: parallel string/integer
//! arrays, scalars, or fixed-size tuple lists. These helpers decode them,
//! reporting any shape mismatch as a connectivity-class failure; an
//! undecodable answer is not "no data".

use serde_json::Value;
use shared_types::{AccessError, Address};

fn shape_err(context: &str) -> AccessError {
    AccessError::Connectivity(format!("unexpected ledger response shape: {context}"))
}

/// The `index`-th column of a tuple-of-arrays response.
pub(crate) fn column<'v>(value: &'v Value, index: usize) -> Result<&'v Vec<Value>, AccessError> {
    value
        .get(index)
        .and_then(Value::as_array)
        .ok_or_else(|| shape_err(&format!("missing array column {index}")))
}

pub(crate) fn strings(value: &Value, index: usize) -> Result<Vec<String>, AccessError> {
    column(value, index)?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| shape_err("expected string element"))
        })
        .collect()
}

pub(crate) fn addresses(value: &Value, index: usize) -> Result<Vec<Address>, AccessError> {
    strings(value, index)?
        .iter()
        .map(|raw| {
            Address::parse(raw).map_err(|e| shape_err(&format!("bad address element: {e}")))
        })
        .collect()
}

pub(crate) fn u64s(value: &Value, index: usize) -> Result<Vec<u64>, AccessError> {
    column(value, index)?
        .iter()
        .map(|v| v.as_u64().ok_or_else(|| shape_err("expected integer element")))
        .collect()
}

pub(crate) fn bools(value: &Value, index: usize) -> Result<Vec<bool>, AccessError> {
    column(value, index)?
        .iter()
        .map(|v| v.as_bool().ok_or_else(|| shape_err("expected bool element")))
        .collect()
}

/// Decimal-string amounts (the wire carries large amounts as text).
pub(crate) fn amounts(value: &Value, index: usize) -> Result<Vec<u128>, AccessError> {
    strings(value, index)?
        .iter()
        .map(|raw| {
            raw.parse::<u128>()
                .map_err(|_| shape_err("expected decimal amount"))
        })
        .collect()
}

/// A small integer constrained to `0..=max`. Values outside the domain
/// range are a shape anomaly like any other: the ledger validated them at
/// write time, so an out-of-range answer is not data to clamp.
pub(crate) fn ranged_u8(raw: u64, max: u8, context: &str) -> Result<u8, AccessError> {
    u8::try_from(raw)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| shape_err(context))
}

pub(crate) fn scalar_u64(value: &Value) -> Result<u64, AccessError> {
    value
        .as_u64()
        .ok_or_else(|| shape_err("expected integer scalar"))
}

pub(crate) fn scalar_amount(value: &Value) -> Result<u128, AccessError> {
    value
        .as_str()
        .and_then(|s| s.parse::<u128>().ok())
        .ok_or_else(|| shape_err("expected decimal amount scalar"))
}

pub(crate) fn tuple_str(tuple: &Value, index: usize) -> Result<String, AccessError> {
    tuple
        .get(index)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| shape_err(&format!("missing string field {index}")))
}

pub(crate) fn tuple_u64(tuple: &Value, index: usize) -> Result<u64, AccessError> {
    tuple
        .get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| shape_err(&format!("missing integer field {index}")))
}

pub(crate) fn tuple_address(tuple: &Value, index: usize) -> Result<Address, AccessError> {
    let raw = tuple_str(tuple, index)?;
    Address::parse(&raw).map_err(|e| shape_err(&format!("bad address field: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_parallel_arrays() {
        let value = json!([["Math", "Physics"], [85, 90]]);
        assert_eq!(strings(&value, 0).unwrap(), vec!["Math", "Physics"]);
        assert_eq!(u64s(&value, 1).unwrap(), vec![85, 90]);
    }

    #[test]
    fn shape_mismatch_is_connectivity_not_empty() {
        let value = json!({"weird": true});
        let err = strings(&value, 0).unwrap_err();
        assert!(matches!(err, AccessError::Connectivity(_)));
    }

    #[test]
    fn out_of_range_integers_are_shape_errors_not_clamped() {
        assert_eq!(ranged_u8(90, 100, "mark out of range").unwrap(), 90);
        assert_eq!(ranged_u8(4, 4, "year out of range").unwrap(), 4);
        for raw in [101, 300, u64::from(u8::MAX) + 1] {
            let err = ranged_u8(raw, 100, "mark out of range").unwrap_err();
            assert!(matches!(err, AccessError::Connectivity(_)));
            assert!(err.to_string().contains("mark out of range"));
        }
        assert!(ranged_u8(5, 4, "year out of range").is_err());
    }

    #[test]
    fn empty_columns_decode_to_empty_vectors() {
        let value = json!([[], []]);
        assert!(strings(&value, 0).unwrap().is_empty());
        assert!(u64s(&value, 1).unwrap().is_empty());
    }
}
