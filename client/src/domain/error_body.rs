//! Human-readable messages from backend error bodies.
//!
//! Error bodies come in a few shapes: `{"detail": "..."}`, a field map such
//! as `{"amount": ["A valid number is required."]}`, a bare list of
//! messages, or something that is not JSON at all. Only the last yields no
//! message; the use case then shows its own fallback.

use serde_json::{Map, Value};

const MESSAGE_KEYS: [&str; 2] = ["detail", "error"];

/// Decoded error body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
    pub(crate) json: Option<Value>,
}

/// Derive a message from a raw response body.
pub(crate) fn describe_error_body(body: &[u8]) -> ErrorBody {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => ErrorBody {
            message: describe_value(&json),
            json: Some(json),
        },
        Err(_) => ErrorBody {
            message: None,
            json: None,
        },
    }
}

fn describe_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(fields) => describe_object(fields),
        Value::Array(items) => non_empty(join_messages(items)),
        Value::String(text) => non_empty(text.trim().to_owned()),
        _ => None,
    }
}

fn describe_object(fields: &Map<String, Value>) -> Option<String> {
    for key in MESSAGE_KEYS {
        if let Some(Value::String(message)) = fields.get(key) {
            if !message.trim().is_empty() {
                return Some(message.clone());
            }
        }
    }

    let parts: Vec<String> = fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", field_messages(messages)))
        .collect();
    non_empty(parts.join(" | "))
}

fn field_messages(value: &Value) -> String {
    match value {
        Value::Array(items) => join_messages(items),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn join_messages(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whitespace-compacted, truncated body text for logs.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
