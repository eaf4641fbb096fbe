//! Typed decoding of response bodies.
//!
//! A [`ResponseFormat`] turns the buffered body of a successful response
//! into its typed output. The body is buffered exactly once before decoding,
//! so a failed JSON decode can always hand back the raw text it could not
//! parse without a second network read.

use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::result::ApiResult;

/// How a successful body is decoded into a typed output.
pub trait ResponseFormat {
    type Output;

    fn decode(body: Bytes) -> ApiResult<Self::Output>;
}

/// JSON decode into any `Deserialize` type.
///
/// A decode failure becomes [`AppError::Parse`] carrying the original body
/// text, so callers can inspect what the server actually sent.
pub struct JsonFormat<T>(PhantomData<T>);

impl<T: DeserializeOwned> ResponseFormat for JsonFormat<T> {
    type Output = T;

    fn decode(body: Bytes) -> ApiResult<T> {
        serde_json::from_slice(&body).map_err(|source| {
            let raw = String::from_utf8_lossy(&body).into_owned();
            AppError::parse(raw, source)
        })
    }
}

/// The body as text. Invalid UTF-8 is replaced, never an error.
pub struct TextFormat;

impl ResponseFormat for TextFormat {
    type Output = String;

    fn decode(body: Bytes) -> ApiResult<String> {
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// The raw body bytes, untouched.
pub struct BinaryFormat;

impl ResponseFormat for BinaryFormat {
    type Output = Bytes;

    fn decode(body: Bytes) -> ApiResult<Bytes> {
        Ok(body)
    }
}

/// Best-effort read of a non-success body.
///
/// JSON when the content type says so, falling back to the body text when
/// the JSON is invalid; `None` only when the bytes are not text either.
/// This path never produces an error.
pub(crate) fn read_error_body(content_type: &str, body: &[u8]) -> Option<Value> {
    if content_type.contains("application/json") {
        if let Ok(value) = serde_json::from_slice(body) {
            return Some(value);
        }
    }
    std::str::from_utf8(body)
        .ok()
        .map(|text| Value::String(text.to_owned()))
}
