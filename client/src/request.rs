//! Request configuration: method, headers, body, deadline, cancellation.

use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tokio_util::sync::CancellationToken;

/// Deadline applied when the caller sets none.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept header injected when the caller supplies none, so the server can
/// negotiate between JSON and plain text.
pub(crate) const DEFAULT_ACCEPT: &str = "application/json, text/plain;q=0.9, */*;q=0.8";

/// HTTP methods accepted by the safety layer.
///
/// ## Examples
///
/// ```rust
/// use client::RequestMethod;
///
/// assert_eq!(RequestMethod::default(), RequestMethod::Get);
/// assert!(RequestMethod::Post.has_body());
///
/// let parsed: RequestMethod = "DELETE".parse().unwrap();
/// assert_eq!(parsed, RequestMethod::Delete);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    /// Returns `true` if this method typically carries a request body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        method.to_reqwest()
    }
}

/// Payload attached to a request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized to JSON text; `Content-Type: application/json` is injected
    /// unless the caller already set one.
    Json(Value),
    /// Passed through untouched with no header injection. Covers opaque
    /// payloads such as pre-encoded multipart bodies.
    Raw(Bytes),
}

/// Per-call configuration for [`Client::fetch`](crate::Client::fetch).
///
/// All settings are optional; the defaults are a GET with no body, the
/// default Accept header, a 10 second deadline, and no cancellation token.
///
/// ## Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use client::{RequestMethod, RequestOptions};
/// use serde_json::json;
///
/// let opts = RequestOptions::new()
///     .method(RequestMethod::Post)
///     .json(json!({ "email": "a@b.c", "password": "hunter22" }))
///     .timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) method: RequestMethod,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) timeout: Duration,
    pub(crate) cancel: Option<CancellationToken>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: RequestMethod::default(),
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            cancel: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a header. Caller headers override the injected defaults; an
    /// invalid name or value surfaces as a Network error at fetch time, the
    /// same way the transport would reject it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attaches an opaque body, passed through unmodified.
    pub fn raw(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Composes an external cancellation source with the internal deadline;
    /// whichever fires first aborts the call.
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
