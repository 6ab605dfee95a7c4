//! HTTP mapping for service errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rainyield_core::ErrorBody;
use rainyield_error::RainyieldError;
use tracing::{error, warn};

/// A [`RainyieldError`] on its way to becoming an HTTP response.
///
/// Request errors become 400; provider, prediction and configuration
/// errors become 500. The body carries the message without the source
/// location.
#[derive(Debug, derive_more::From)]
pub struct ApiError(RainyieldError);

impl ApiError {
    /// Wrap anything convertible into a [`RainyieldError`].
    pub fn new(err: impl Into<RainyieldError>) -> Self {
        Self(err.into())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message for the response body.
    pub fn message(&self) -> String {
        self.0.user_message()
    }

    /// The wrapped error.
    pub fn inner(&self) -> &RainyieldError {
        &self.0
    }

    /// Log at a level matching the status.
    pub fn log(&self) {
        if self.0.is_client_error() {
            warn!(error = %self.0, "Rejected request");
        } else {
            error!(error = %self.0, "Request failed");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainyield_error::{
        PredictionError, PredictionErrorKind, ProviderError, ProviderErrorKind, RequestError,
        RequestErrorKind,
    };

    #[test]
    fn test_status_by_kind() {
        let bad = ApiError::new(RequestError::new(RequestErrorKind::MissingField(
            "rainfall".into(),
        )));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(bad.message(), "Missing required field: rainfall");

        let upstream = ApiError::new(ProviderError::new(ProviderErrorKind::MissingApiKey(
            "LLAMA_API_KEY".into(),
        )));
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.message(), "LLAMA_API_KEY environment variable not set");

        let range = ApiError::new(PredictionError::new(PredictionErrorKind::OutOfRange {
            value: 42.0,
            min: 0.0,
            max: 20.0,
        }));
        assert_eq!(range.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
