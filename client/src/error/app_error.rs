use serde_json::Value;
use strum::{Display, EnumIter};
use thiserror::Error;

pub(crate) const NETWORK_FAILED: &str = "Network request failed";
pub(crate) const REQUEST_ABORTED: &str = "Request aborted";
pub(crate) const TIMED_OUT: &str = "Request timed out";
pub(crate) const PARSE_FAILED: &str = "Failed to parse JSON response";
pub(crate) const VALIDATION_FAILED: &str = "Response validation failed";

/// A single schema-validation failure addressed to a field.
///
/// `path` is a dot-joined locator (`"profile.email"`); it is empty for
/// failures that are not tied to a specific field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Discriminant of [`AppError`], usable as a map key for per-kind overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ErrorKind {
    Network,
    Timeout,
    Http,
    Parse,
    Validation,
}

/// Classified failure of a safe fetch.
///
/// The taxonomy is closed and total: every failure path of
/// [`Client::fetch`](crate::Client::fetch) maps to exactly one variant, and
/// unexpected transport rejections fold into [`AppError::Network`] rather
/// than leaking an unclassified error to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Transport-level failure: DNS, refused connection, an invalid URL or
    /// header, or an externally cancelled request.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The configured deadline elapsed before the exchange settled.
    #[error("{message} after {timeout_ms} ms")]
    Timeout { message: String, timeout_ms: u64 },

    /// The server responded with a non-success status. The body is captured
    /// best-effort: a JSON value when the content type says so, else the
    /// body text, else `None`.
    #[error("HTTP {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Option<Value>,
    },

    /// A successful response whose body could not be decoded. `raw` holds
    /// the undecodable body text.
    #[error("{message}")]
    Parse {
        message: String,
        raw: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The body decoded but did not match the declared schema.
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },
}

impl AppError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn network_from(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    /// A request cancelled by an external token, as opposed to the deadline.
    pub fn aborted() -> Self {
        Self::network(REQUEST_ABORTED)
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout {
            message: TIMED_OUT.to_string(),
            timeout_ms,
        }
    }

    pub fn http(status: u16, status_text: impl Into<String>, body: Option<Value>) -> Self {
        Self::Http {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    pub fn parse(raw: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            message: PARSE_FAILED.to_string(),
            raw: raw.into(),
            source: Some(source),
        }
    }

    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self::Validation {
            message: VALIDATION_FAILED.to_string(),
            issues,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(AppError::network("x").kind(), ErrorKind::Network);
        assert_eq!(AppError::timeout(10).kind(), ErrorKind::Timeout);
        assert_eq!(AppError::http(500, "Internal Server Error", None).kind(), ErrorKind::Http);
        assert_eq!(AppError::validation(vec![]).kind(), ErrorKind::Validation);
    }

    #[test]
    fn predicates_track_kind() {
        let err = AppError::timeout(250);
        assert!(err.is_timeout());
        assert!(!err.is_network());
        assert!(!err.is_http());
    }

    #[test]
    fn timeout_display_includes_deadline() {
        let err = AppError::timeout(5_000);
        assert_eq!(err.to_string(), "Request timed out after 5000 ms");
    }

    #[test]
    fn http_display_includes_status() {
        let err = AppError::http(404, "Not Found", None);
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[test]
    fn kind_covers_all_variants() {
        assert_eq!(ErrorKind::iter().count(), 5);
    }
}
