//! Tolerant serde helpers for upstream fields.
//!
//! Providers are inconsistent about whether a numeric field arrives as a JSON
//! number, a numeric string, or `null`. These helpers accept all three so a
//! single odd field never fails the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string, a number or null. Numbers are kept in their textual form.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts a number, a string or null.
///
/// A string that is not a number becomes `NaN` so the normalizer can tell a
/// present-but-corrupt field from an absent one.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        _ => None,
    })
}
