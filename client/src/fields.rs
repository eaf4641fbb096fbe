//! Per-field error extraction from server error bodies.
//!
//! Servers report field-level failures in several shapes; this module
//! normalizes the known conventions into one flat, insertion-ordered map so
//! form code never branches on a body layout.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::AppError;

/// Flat mapping from field path to user-facing message, in the order the
/// server reported the fields.
pub type FieldErrors = IndexMap<String, String>;

/// Extracts per-field errors from an HTTP error body.
///
/// Returns `None` unless the error is [`AppError::Http`] with a JSON object
/// body. The known conventions are tried in order, and the first one that
/// yields at least one entry wins:
///
/// 1. `fieldErrors` (or `errors` when `fieldErrors` is absent): an object of
///    field name to message string or array of strings (first element).
/// 2. `details`: an array of `{ path, message }` objects; entries missing
///    either field are skipped.
/// 3. `issues`: an array where `path` may be a segment list (joined with
///    ".") or a scalar, paired with `message`.
pub fn parse_field_errors(error: &AppError) -> Option<FieldErrors> {
    let AppError::Http {
        body: Some(Value::Object(body)),
        ..
    } = error
    else {
        return None;
    };

    // When fieldErrors is present (even empty), errors is not consulted.
    let kv = match body.get("fieldErrors") {
        Some(v) if !v.is_null() => Some(v),
        _ => body.get("errors"),
    };
    if let Some(Value::Object(kv)) = kv {
        let mut out = FieldErrors::new();
        for (field, value) in kv {
            let message = match value {
                Value::Array(items) => items.first().map(value_text),
                Value::Null => None,
                other => Some(value_text(other)),
            };
            if let Some(message) = message {
                out.insert(field.clone(), message);
            }
        }
        if !out.is_empty() {
            return Some(out);
        }
    }

    if let Some(Value::Array(details)) = body.get("details") {
        let mut out = FieldErrors::new();
        for entry in details {
            let path = entry.get("path").map(text_or_empty).unwrap_or_default();
            let message = entry.get("message").map(text_or_empty).unwrap_or_default();
            if !path.is_empty() && !message.is_empty() {
                out.insert(path, message);
            }
        }
        if !out.is_empty() {
            return Some(out);
        }
    }

    if let Some(Value::Array(issues)) = body.get("issues") {
        let mut out = FieldErrors::new();
        for entry in issues {
            let path = match entry.get("path") {
                Some(Value::Array(segments)) => segments
                    .iter()
                    .map(value_text)
                    .collect::<Vec<_>>()
                    .join("."),
                Some(scalar) => text_or_empty(scalar),
                None => String::new(),
            };
            let message = entry.get("message").map(text_or_empty).unwrap_or_default();
            if !path.is_empty() && !message.is_empty() {
                out.insert(path, message);
            }
        }
        if !out.is_empty() {
            return Some(out);
        }
    }

    None
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or_empty(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_text(other),
    }
}
