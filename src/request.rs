//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use serde_json::{Map, Value};

/// An incoming HTTP request with its body fully read and its path
/// parameters resolved by the router.
pub struct Request {
    method: Method,
    path: String,
    body: Bytes,
    params: HashMap<String, String>,
}

/// Why a request body could not be turned into a JSON object.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            body,
            params,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }

    /// Returns a named path parameter.
    ///
    /// For a route `/orders/{id}`, `req.param("id")` on `/orders/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses the body as a JSON object. An empty body reads as `{}`.
    pub fn json_object(&self) -> Result<Map<String, Value>, BodyError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice(&self.body)? {
            Value::Object(map) => Ok(map),
            _ => Err(BodyError::NotAnObject),
        }
    }
}
