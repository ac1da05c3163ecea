//! Error rendering.
//!
//! Maps each [`DirectoryError`] kind onto a status code and an [`ApiError`]
//! body carrying the correlation ID.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use std::time::Duration;

use crate::error::{ApiError, DirectoryError};
use crate::http::RequestId;

pub fn status_for(error: &DirectoryError) -> StatusCode {
    match error {
        DirectoryError::BadRequest(_) => StatusCode::BAD_REQUEST,
        DirectoryError::NotFound { .. } | DirectoryError::NoData => StatusCode::NOT_FOUND,
        DirectoryError::UpstreamInternal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DirectoryError::UpstreamRedirect { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// A directory failure bound to the request it happened in.
#[derive(Debug)]
pub struct ApiFailure {
    pub request_id: RequestId,
    pub error: DirectoryError,
}

impl ApiFailure {
    pub fn new(request_id: &RequestId, error: DirectoryError) -> Self {
        Self {
            request_id: request_id.clone(),
            error,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        if status.is_server_error() {
            tracing::error!(
                request_id = %self.request_id,
                reason_code = self.error.reason_code(),
                detail = self.error.detail().unwrap_or_default(),
                "Request failed"
            );
        } else {
            tracing::debug!(
                request_id = %self.request_id,
                reason_code = self.error.reason_code(),
                error = %self.error,
                "Request rejected"
            );
        }

        (status, Json(ApiError::new(self.request_id.as_str(), &self.error))).into_response()
    }
}

/// 408 with an [`ApiError`] body for a request that ran past its deadline.
pub fn deadline_exceeded(request_id: &RequestId, limit: Duration) -> Response {
    tracing::warn!(request_id = %request_id, limit = ?limit, "Request deadline exceeded");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ApiError::timed_out(request_id.as_str(), limit)),
    )
        .into_response()
}
