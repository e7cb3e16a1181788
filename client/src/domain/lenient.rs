//! Lenient field decoding for server-owned records.
//!
//! Backends are not schema-checked. Amounts may arrive as decimal strings or
//! JSON numbers; anything unreadable decodes as `None` and the caller picks
//! the default explicitly.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a decimal from a JSON string or number.
///
/// # Examples
/// ```
/// use client::domain::parse_amount_value;
/// use serde_json::json;
///
/// assert_eq!(parse_amount_value(&json!("3.50")).unwrap().to_string(), "3.50");
/// assert!(parse_amount_value(&json!("abc")).is_none());
/// ```
pub fn parse_amount_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .ok()
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        _ => None,
    }
}

/// `deserialize_with` helper for optional amounts.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_amount_value))
}

/// `deserialize_with` helper for optional display text. Numbers and booleans
/// are kept as their JSON text; other shapes decode as `None`.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
        _ => None,
    })
}

/// Return the first value that is present and not blank.
pub(crate) fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.trim().is_empty())
}
