//! Uniform JSON response wrapper.
//!
//! Success envelopes carry `data` and never a `cause`; failure envelopes
//! carry a `cause` and never `data`. Absent fields are omitted, not `null`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Cause used when required query parameters are missing.
pub const MISSING_PARAMETERS_CAUSE: &str =
    "You are missing required parameters for this response to work properly.";

/// Cause returned for every store driver failure. Details are only logged.
pub const INTERNAL_CAUSE: &str = "An internal error occurred while accessing the data store.";

/// Where a read was served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedFrom {
    pub database: String,
    pub collection: String,
}

impl FetchedFrom {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Response body plus the HTTP status it is sent with.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<FetchedFrom>,
}

impl Envelope {
    fn success(status: StatusCode, data: impl Into<Value>) -> Self {
        Self {
            status,
            success: true,
            cause: None,
            data: Some(data.into()),
            from: None,
        }
    }

    fn failure(status: StatusCode, cause: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            cause: Some(cause.into()),
            data: None,
            from: None,
        }
    }

    /// 201, after a create.
    pub fn created(data: impl Into<Value>) -> Self {
        Self::success(StatusCode::CREATED, data)
    }

    /// 200, after an update.
    pub fn ok(data: impl Into<Value>) -> Self {
        Self::success(StatusCode::OK, data)
    }

    /// 200, after a read, tagged with its origin.
    pub fn fetched(data: impl Into<Value>, from: FetchedFrom) -> Self {
        Self {
            from: Some(from),
            ..Self::success(StatusCode::OK, data)
        }
    }

    /// 202, after a delete. `data` is the deleted document.
    pub fn accepted(data: impl Into<Value>) -> Self {
        Self::success(StatusCode::ACCEPTED, data)
    }

    pub fn bad_request(cause: impl Into<String>) -> Self {
        Self::failure(StatusCode::BAD_REQUEST, cause)
    }

    pub fn not_found(cause: impl Into<String>) -> Self {
        Self::failure(StatusCode::NOT_FOUND, cause)
    }

    pub fn missing_parameters() -> Self {
        Self::bad_request(MISSING_PARAMETERS_CAUSE)
    }

    pub fn unauthorized(cause: impl Into<String>) -> Self {
        Self::failure(StatusCode::UNAUTHORIZED, cause)
    }

    pub fn internal() -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_CAUSE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
