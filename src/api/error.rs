//! Classification of handler failures into HTTP responses.

use http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::db::StorageError;
use crate::request::BodyError;
use crate::response::{IntoResponse, Json, Response};
use crate::validate::Violation;

/// Everything a handler can fail with.
///
/// | Variant | Status | Body |
/// |---|---|---|
/// | `Validation` | 400 | `{"errors":[{"field","message"},...]}` |
/// | `NotFound` | 404 | `{"message":...}` |
/// | `Storage` | 500 | `{"message":"Internal server error","code":...}` |
///
/// Storage details are logged, never sent.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed validation ({} violations)", .0.len())]
    Validation(Vec<Violation>),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// A single violation on `field`.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![Violation::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Vec<Violation>> for ApiError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }
}

impl From<BodyError> for ApiError {
    fn from(e: BodyError) -> Self {
        Self::invalid("body", e.to_string())
    }
}

#[derive(Serialize)]
struct Errors<'a> {
    errors: &'a [Violation],
}

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(violations) => {
                debug!(violations = violations.len(), "rejected invalid input");
                Json(Errors { errors: violations }).into_response()
            }
            Self::NotFound(message) => Json(Message { message, code: None }).into_response(),
            Self::Storage(e) => {
                error!(code = e.code(), error = %e, "storage failure");
                Json(Message { message: "Internal server error", code: Some(e.code()) }).into_response()
            }
        };
        body.with_status(status)
    }
}
