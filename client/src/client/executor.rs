//! Request execution with deadline and cancellation racing.
//!
//! One [`Client::fetch`] call issues exactly one network exchange and
//! resolves exactly once: with the decoded output, or with one member of the
//! closed [`AppError`] taxonomy. The exchange future is raced against the
//! configured deadline and the optional external cancellation token; the
//! losing futures are dropped, so no timer or watch outlives the call.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, Span};
use url::Url;

use crate::error::{AppError, NETWORK_FAILED};
use crate::request::{RequestBody, RequestOptions, DEFAULT_ACCEPT};
use crate::response::{read_error_body, JsonFormat, ResponseFormat};
use crate::result::ApiResult;
use crate::schema::Schema;

/// Cookie behavior of the wrapped HTTP client.
///
/// `Include` keeps a cookie jar and sends stored cookies with every request;
/// `Omit` disables the jar entirely. The transport scopes cookie policy per
/// client, so the knob lives here rather than on [`RequestOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// Builder for configuring a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    credentials: Credentials,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            credentials: Credentials::default(),
        }
    }

    /// Sets a base URL; relative request paths are joined against it.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, AppError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| AppError::network(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| AppError::network(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the cookie behavior. The default is [`Credentials::Include`].
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Builds the [`Client`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Client, AppError> {
        let mut builder = reqwest::Client::builder().default_headers(self.default_headers.clone());
        if self.credentials == Credentials::Include {
            builder = builder.cookie_store(true);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::network_from("failed to construct HTTP client", e))?;

        Ok(Client {
            client,
            base_url: self.base_url,
            default_headers: self.default_headers,
        })
    }
}

/// Async HTTP client that never throws past its boundary.
///
/// Every failure of [`fetch`](Client::fetch) — transport rejection, elapsed
/// deadline, external cancellation, non-success status, undecodable body,
/// schema mismatch — is classified into [`AppError`] and carried in the
/// returned [`ApiResult`].
///
/// ## Examples
///
/// ```rust,ignore
/// use client::{Client, RequestOptions};
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64, name: String }
///
/// let client = Client::builder()
///     .base_url(url::Url::parse("https://api.example.com")?)
///     .build()?;
///
/// match client.fetch_json::<User>("/users/1", RequestOptions::new()).await {
///     Ok(user) => println!("hello {}", user.name),
///     Err(e) => eprintln!("{}", client::error_to_message(&e, None)),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: Option<Url>,
    default_headers: HeaderMap,
}

impl Client {
    /// Creates a new builder for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, AppError> {
        Self::builder().build()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Executes one request and decodes the response per `F`.
    ///
    /// The whole exchange — send, status check, body read — runs under the
    /// configured deadline and the optional cancellation token. An elapsed
    /// deadline classifies as [`AppError::Timeout`]; an external cancellation
    /// classifies as [`AppError::Network`], never as Timeout.
    #[instrument(
        name = "fetch",
        skip(self, url, options),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn fetch<F>(&self, url: &str, options: RequestOptions) -> ApiResult<F::Output>
    where
        F: ResponseFormat,
    {
        let timeout = options.timeout;
        let cancel = options.cancel.clone();
        let exchange = self.exchange::<F>(url, options);

        let guarded = async move {
            match cancel {
                Some(token) => tokio::select! {
                    out = exchange => Some(out),
                    () = token.cancelled() => None,
                },
                None => Some(exchange.await),
            }
        };

        match tokio::time::timeout(timeout, guarded).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(AppError::aborted()),
            Err(_) => Err(AppError::timeout(timeout.as_millis() as u64)),
        }
    }

    /// Executes one request and decodes the JSON body into `T`.
    pub async fn fetch_json<T>(&self, url: &str, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        self.fetch::<JsonFormat<T>>(url, options).await
    }

    /// Executes one request, decodes the JSON body, and validates it.
    ///
    /// A failed validation becomes [`AppError::Validation`] with the
    /// validator's issues flattened to dot-joined paths, in the order the
    /// validator reported them.
    pub async fn fetch_with_schema<S>(
        &self,
        url: &str,
        options: RequestOptions,
        schema: &S,
    ) -> ApiResult<S::Output>
    where
        S: Schema,
    {
        let value = self.fetch::<JsonFormat<Value>>(url, options).await?;
        match schema.validate(value) {
            Ok(output) => Ok(output),
            Err(issues) => Err(AppError::validation(
                issues.into_iter().map(|issue| issue.flatten()).collect(),
            )),
        }
    }

    /// The raced portion of a fetch: send, status check, body read, decode.
    async fn exchange<F>(&self, url: &str, options: RequestOptions) -> ApiResult<F::Output>
    where
        F: ResponseFormat,
    {
        let url = self.resolve_url(url)?;
        Span::current().record("http.method", options.method.to_string().as_str());
        Span::current().record("http.url", url.as_str());

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| AppError::network(format!("invalid header name: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| AppError::network(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }
        // Injection only fills the gap: a caller- or client-level header wins.
        if !headers.contains_key(ACCEPT) && !self.default_headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        }

        let mut request = self.client.request(options.method.to_reqwest(), url);
        match options.body {
            Some(RequestBody::Json(value)) => {
                if !headers.contains_key(CONTENT_TYPE) && !self.default_headers.contains_key(CONTENT_TYPE)
                {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                let text = serde_json::to_string(&value)
                    .map_err(|e| AppError::network(format!("failed to serialize request body: {e}")))?;
                request = request.body(text);
            }
            Some(RequestBody::Raw(bytes)) => {
                request = request.body(bytes);
            }
            None => {}
        }

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| AppError::network_from(NETWORK_FAILED, e))?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let otel_status = if status.is_server_error() { "ERROR" } else { "UNSET" };
            Span::current().record("otel.status_code", otel_status);

            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            // Best-effort capture; an unreadable body is still an HttpError.
            let body = match response.bytes().await {
                Ok(bytes) => read_error_body(&content_type, &bytes),
                Err(_) => None,
            };
            return Err(AppError::http(status.as_u16(), status_text, body));
        }

        Span::current().record("otel.status_code", "OK");

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::network_from(NETWORK_FAILED, e))?;
        F::decode(body)
    }

    fn resolve_url(&self, url: &str) -> ApiResult<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(url)
                    .map_err(|e| AppError::network(format!("invalid URL: {e}"))),
                None => Err(AppError::network(format!("invalid URL: {url}"))),
            },
            Err(e) => Err(AppError::network(format!("invalid URL: {e}"))),
        }
    }
}
