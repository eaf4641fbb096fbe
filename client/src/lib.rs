//! Request/response safety layer for HTTP APIs.
//!
//! Every request goes through [`Client::fetch`], which enforces a deadline,
//! classifies all failures into the closed [`AppError`] taxonomy, optionally
//! validates the decoded body against a [`Schema`], and returns an
//! [`ApiResult`] instead of panicking or leaking transport errors.
//!
//! ## Modules
//!
//! - [`client`] - Client construction and request execution
//! - [`error`] - The [`AppError`] taxonomy and user-facing message projection
//! - [`fields`] - Per-field error extraction from server error bodies
//! - [`request`] - Request configuration (method, headers, body, deadline)
//! - [`response`] - Typed decoding of successful response bodies
//! - [`result`] - The [`ApiResult`] alias and async chaining
//! - [`schema`] - The validator seam applied after JSON decoding

pub mod client;
pub mod error;
pub mod fields;
pub mod request;
pub mod response;
pub mod result;
pub mod schema;

pub use self::client::{Client, ClientBuilder, Credentials};
pub use self::error::{error_to_message, AppError, ErrorKind, MessageMap, ValidationIssue};
pub use self::fields::{parse_field_errors, FieldErrors};
pub use self::request::{RequestBody, RequestMethod, RequestOptions};
pub use self::response::{BinaryFormat, JsonFormat, ResponseFormat, TextFormat};
pub use self::result::{ApiResult, ResultExt};
pub use self::schema::{Schema, SchemaIssue, SerdeSchema};
