//! Canonical JSON normalization and digest computation (RFC 8785-class).
//!
//! Revision hashes must not depend on how a client happened to order keys
//! or spell numbers, so specs are canonicalized before hashing:
//! - UTF-16 code unit ordering for object keys (§3.2.3)
//! - Integer-valued floats collapse to integers; NaN/Infinity are rejected
//! - SHA256 hex digest over the compact canonical text

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

use crate::domain::error::DigestError;

/// Normalize numbers and sort object keys in a single pass.
fn canonicalize(value: &Value) -> Result<Value, DigestError> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

            let mut sorted = Map::new();
            for (key, v) in entries {
                sorted.insert(key.clone(), canonicalize(v)?);
            }
            Ok(Value::Object(sorted))
        }
        Value::Array(items) => items
            .iter()
            .map(canonicalize)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Number(n) => canonical_number(n).map(Value::Number),
        other => Ok(other.clone()),
    }
}

/// 2^63 and 2^64, both exactly representable as `f64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

fn canonical_number(n: &Number) -> Result<Number, DigestError> {
    if n.is_i64() || n.is_u64() {
        return Ok(n.clone());
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => Err(DigestError::NonFiniteNumber),
        // Upper bounds are exclusive: `as` casts saturate at the edge.
        Some(f) if f.fract() == 0.0 && f >= -I64_END && f < I64_END => {
            Ok(Number::from(f as i64))
        }
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f < U64_END => Ok(Number::from(f as u64)),
        _ => Ok(n.clone()),
    }
}

/// Convert a JSON value to canonical compact text.
///
/// Note: `serde_json::Map` keeps insertion order only with the
/// `preserve_order` feature; without it keys come back in byte order, which
/// matches UTF-16 order for the ASCII keys definitions use.
pub fn canonical_json(value: &Value) -> Result<String, DigestError> {
    let canonical = canonicalize(value)?;
    Ok(serde_json::to_string(&canonical)?)
}

/// Compute the SHA256 hex digest of a value's canonical JSON.
pub fn compute_digest(value: &Value) -> Result<String, DigestError> {
    let canonical = canonical_json(value)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}
