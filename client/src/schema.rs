//! The validator seam applied after JSON decoding.
//!
//! A [`Schema`] is handed the decoded body and either returns the validated
//! (possibly coerced) output or a list of [`SchemaIssue`]s addressed by path
//! segments. The fetch layer flattens segments into dot-joined
//! [`ValidationIssue`](crate::ValidationIssue) locators.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationIssue;

/// A failure reported by a validator, addressed by path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// An issue not tied to any field.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    pub(crate) fn flatten(self) -> ValidationIssue {
        ValidationIssue::new(self.path.join("."), self.message)
    }
}

/// Validates a decoded JSON value.
///
/// Implementations are free to coerce while validating (parse dates, trim
/// strings); the fetch layer returns whatever `Output` they produce.
pub trait Schema {
    type Output;

    fn validate(&self, value: Value) -> Result<Self::Output, Vec<SchemaIssue>>;
}

/// Validator backed by serde deserialization.
///
/// Accepts whatever `T::deserialize` accepts, with serde's own coercions;
/// a failure produces a single issue with no field path, since serde does
/// not report structured locations.
pub struct SerdeSchema<T>(PhantomData<T>);

impl<T> SerdeSchema<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerdeSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Schema for SerdeSchema<T> {
    type Output = T;

    fn validate(&self, value: Value) -> Result<T, Vec<SchemaIssue>> {
        serde_json::from_value(value).map_err(|e| vec![SchemaIssue::root(e.to_string())])
    }
}
