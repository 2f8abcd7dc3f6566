//! Coercion of loosely typed numbers into the integer domain.
//!
//! Generic decoders without a native integer type hand every number over as
//! a float, so `5` may arrive as `5.0`. Every numeric field of a description
//! goes through [`normalize`] exactly once, at ingestion.
use serde_json::Value;

use crate::error::{Error, Result};

/// Largest value of a 31-bit stream identifier or window increment.
pub(crate) const MAX_U31: u32 = (1 << 31) - 1;

/// Normalizes an integer or floating-point value to an integer.
///
/// Fractional parts are truncated toward zero, never rounded: `5.9` becomes
/// `5` and `-1.5` becomes `-1`. Anything that is not a number fails with a
/// type mismatch.
///
/// ```
/// use serde_json::json;
///
/// assert_eq!(h2fingerprint::normalize(&json!(5)).unwrap(), 5);
/// assert_eq!(h2fingerprint::normalize(&json!(5.0)).unwrap(), 5);
/// assert_eq!(h2fingerprint::normalize(&json!(5.9)).unwrap(), 5);
/// assert!(h2fingerprint::normalize(&json!("5")).is_err());
/// ```
pub fn normalize(value: &Value) -> Result<i64> {
    let number = match value {
        Value::Number(number) => number,
        other => {
            return Err(Error::type_mismatch(format!(
                "expected a number, found {}",
                describe(other)
            )))
        }
    };

    if let Some(n) = number.as_i64() {
        return Ok(n);
    }

    if let Some(n) = number.as_u64() {
        return Err(Error::out_of_range(format!("{n} does not fit in 64 bits")));
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() < i64::MAX as f64 => {
            Ok(f.trunc() as i64)
        }
        Some(f) => Err(Error::out_of_range(format!("{f} does not fit in 64 bits"))),
        None => Err(Error::type_mismatch(format!("unsupported number {number}"))),
    }
}

/// Normalizes a value that must fit in an unsigned 32-bit field.
pub(crate) fn normalize_u32(value: &Value) -> Result<u32> {
    let n = normalize(value)?;
    u32::try_from(n).map_err(|_| Error::out_of_range(format!("{n} is not a 32-bit unsigned integer")))
}

/// Normalizes a value that must fit in a 31-bit stream identifier or window
/// increment.
pub(crate) fn normalize_u31(value: &Value) -> Result<u32> {
    let n = normalize(value)?;
    match u32::try_from(n) {
        Ok(n) if n <= MAX_U31 => Ok(n),
        _ => Err(Error::out_of_range(format!("{n} is not a 31-bit unsigned integer"))),
    }
}

/// Names the JSON type of a value for error messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
