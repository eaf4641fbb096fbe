use std::collections::HashMap;

use serde_json::Value;

use super::app_error::{AppError, ErrorKind};
use super::{NETWORK_FAILED, PARSE_FAILED, TIMED_OUT, VALIDATION_FAILED};

/// Replacement for the built-in message of one error kind.
pub enum MessageOverride {
    /// A literal string, used verbatim.
    Text(String),
    /// A formatter given the typed error.
    With(Box<dyn Fn(&AppError) -> String + Send + Sync>),
}

/// Caller-supplied per-kind message overrides.
///
/// An override fully replaces the built-in default for its kind; kinds
/// without an entry keep the default projection.
///
/// ## Examples
///
/// ```rust,ignore
/// let messages = MessageMap::new()
///     .text(ErrorKind::Timeout, "The server took too long to respond.")
///     .with(ErrorKind::Http, |e| format!("Server rejected the request: {e}"));
/// let msg = error_to_message(&err, Some(&messages));
/// ```
#[derive(Default)]
pub struct MessageMap {
    overrides: HashMap<ErrorKind, MessageOverride>,
}

impl MessageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.overrides.insert(kind, MessageOverride::Text(message.into()));
        self
    }

    pub fn with(
        mut self,
        kind: ErrorKind,
        f: impl Fn(&AppError) -> String + Send + Sync + 'static,
    ) -> Self {
        self.overrides.insert(kind, MessageOverride::With(Box::new(f)));
        self
    }

    fn resolve(&self, error: &AppError) -> Option<String> {
        match self.overrides.get(&error.kind())? {
            MessageOverride::Text(message) => Some(message.clone()),
            MessageOverride::With(f) => Some(f(error)),
        }
    }
}

/// Projects any [`AppError`] to a user-facing message.
///
/// Defaults per kind use the error's own message when it is non-empty and a
/// fixed generic string otherwise; HTTP errors additionally mine the captured
/// body for a server-provided message. Overrides replace the default for
/// their kind entirely.
pub fn error_to_message(error: &AppError, overrides: Option<&MessageMap>) -> String {
    if let Some(message) = overrides.and_then(|map| map.resolve(error)) {
        return message;
    }

    match error {
        AppError::Network { message, .. } => fallback(message, NETWORK_FAILED),
        AppError::Timeout { message, .. } => fallback(message, TIMED_OUT),
        AppError::Parse { message, .. } => fallback(message, PARSE_FAILED),
        AppError::Validation { message, issues } => issues
            .first()
            .map(|issue| issue.message.clone())
            .unwrap_or_else(|| fallback(message, VALIDATION_FAILED)),
        AppError::Http {
            status,
            status_text,
            body,
        } => match body.as_ref().and_then(http_body_message) {
            Some(message) if !message.is_empty() => format!("HTTP {status}: {message}"),
            // Extraction produced an empty message (e.g. an empty array
            // body); the status text is not consulted in that case.
            Some(_) => format!("HTTP {status}"),
            None if !status_text.is_empty() => format!("HTTP {status}: {status_text}"),
            None => format!("HTTP {status}"),
        },
    }
}

fn fallback(message: &str, default: &str) -> String {
    if message.is_empty() {
        default.to_string()
    } else {
        message.to_string()
    }
}

/// Mines a captured HTTP error body for a server-provided message.
///
/// Checks, in order: a plain string body, an array body joined with ", ",
/// an object's `message`/`error`/`detail`/`title`/`msg` string field, and a
/// validator-style `issues[0].message`. An empty or scalar body counts as
/// absent.
fn http_body_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(items.iter().map(text_of).collect::<Vec<_>>().join(", ")),
        Value::Object(map) => {
            let direct = ["message", "error", "detail", "title", "msg"]
                .iter()
                .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
            if let Some(Value::String(s)) = direct {
                return Some(s.clone());
            }
            if let Some(Value::Array(issues)) = map.get("issues") {
                if let Some(message) = issues.first().and_then(|issue| issue.get("message")) {
                    if !is_empty_value(message) {
                        return Some(text_of(message));
                    }
                }
            }
            None
        }
        _ => None,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
