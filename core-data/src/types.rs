use crate::error::{DataError, Result};
use crate::rules::SideEffectOutcome;
use bridge_traits::document::Document;
use serde::Serialize;
use serde_json::Value;

/// A record as returned by the table surface: free-form fields plus the
/// reserved `id` and `createdAt`.
pub type Row = bridge_traits::document::StoredDocument;

/// Structured insert result: the primary row plus the outcome of every
/// side-effect step that ran for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertReport {
    pub rows: Vec<Row>,
    pub side_effects: Vec<SideEffectOutcome>,
}

impl InsertReport {
    /// Whether every side-effect step succeeded.
    pub fn side_effects_ok(&self) -> bool {
        self.side_effects.iter().all(SideEffectOutcome::succeeded)
    }
}

/// Normalize a write payload to a single record.
///
/// Accepts an object or an array of objects; only the first element of an
/// array is honored. That single-record narrowing is observed behavior the
/// callers rely on, not a bulk insert.
pub(crate) fn first_record(payload: &Value) -> Result<Document> {
    match payload {
        Value::Object(map) => Ok(map.clone()),
        Value::Array(items) => match items.first() {
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(DataError::UnsupportedPayload(format!(
                "array element must be an object, got {}",
                json_kind(other)
            ))),
            None => Err(DataError::UnsupportedPayload("empty array".to_string())),
        },
        other => Err(DataError::UnsupportedPayload(format!(
            "expected object or array, got {}",
            json_kind(other)
        ))),
    }
}

/// Read an id-like value: strings pass through, numbers are stringified.
pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
