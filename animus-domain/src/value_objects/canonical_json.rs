// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic JSON encoding used everywhere a hash or signature is taken
//! over a structured value.
//!
//! `serde_json::to_vec` does not guarantee key order for maps, so every
//! value that feeds an `integrity_sha256` or an HMAC signature is first
//! routed through [`to_canonical_bytes`], which recursively sorts object
//! keys and uses a compact, whitespace-free encoding.

use serde::Serialize;
use serde_json::Value;

use crate::value_objects::Sha256Hex;
use crate::GovernanceError;

/// Serializes `value` to canonical JSON bytes: object keys sorted
/// lexicographically at every nesting level, no insignificant whitespace.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, GovernanceError> {
    let json = serde_json::to_value(value)?;
    let canonical = canonicalize(json);
    serde_json::to_vec(&canonical).map_err(GovernanceError::from)
}

/// Computes the `integrity_sha256` of `value`: the SHA-256 digest of its
/// canonical JSON encoding.
pub fn integrity_sha256<T: Serialize>(value: &T) -> Result<Sha256Hex, GovernanceError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(Sha256Hex::of(&bytes))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_affect_hash() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(integrity_sha256(&a).unwrap(), integrity_sha256(&b).unwrap());
    }

    #[test]
    fn nested_objects_are_sorted_too() {
        let value = json!({"outer": {"z": 1, "a": 2}});
        let bytes = to_canonical_bytes(&value).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"z\"").unwrap());
    }
}
