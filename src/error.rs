//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! [`TransportError`] describes one failed upstream fetch attempt; the
//! orchestrator only lets the last one escape, as
//! [`GatewayError::UpstreamUnavailable`].

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid region: XX",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                 |
/// |-----------|------------|-----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request             |
/// | 3000–3999 | Server     | 500 / 502                   |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Region code outside the supported set.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Every upstream transport failed or timed out.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRegion(_) => 1001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::UpstreamUnavailable(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRegion(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

/// Failure of a single upstream fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The attempt did not finish within its budget.
    #[error("{transport} timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Transport label.
        transport: &'static str,
        /// Budget that was exceeded.
        after: Duration,
    },

    /// Connection, TLS or body read failure.
    #[error("{transport} network error: {source}")]
    Network {
        /// Transport label.
        transport: &'static str,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{transport} returned HTTP {status}")]
    Status {
        /// Transport label.
        transport: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Body was not a valid events payload.
    #[error("{transport} returned an unreadable payload: {message}")]
    Decode {
        /// Transport label.
        transport: &'static str,
        /// Parser message.
        message: String,
    },

    /// The request URL could not be built.
    #[error("{transport} is misconfigured: {message}")]
    Config {
        /// Transport label.
        transport: &'static str,
        /// What is wrong.
        message: String,
    },
}

impl TransportError {
    /// Label of the transport that failed.
    #[must_use]
    pub const fn transport(&self) -> &'static str {
        match self {
            Self::Timeout { transport, .. }
            | Self::Network { transport, .. }
            | Self::Status { transport, .. }
            | Self::Decode { transport, .. }
            | Self::Config { transport, .. } => transport,
        }
    }

    /// Returns `true` for the timeout variant.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        let err = GatewayError::InvalidRegion("XX".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn exhausted_transports_are_bad_gateway() {
        let err = GatewayError::from(TransportError::Timeout {
            transport: "public-proxy",
            after: Duration::from_millis(1500),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "upstream unavailable: public-proxy timed out after 1500ms"
        );
    }

    #[test]
    fn transport_label_accessor() {
        let err = TransportError::Status {
            transport: "relay",
            status: 503,
        };
        assert_eq!(err.transport(), "relay");
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn into_response_carries_status() {
        let response = GatewayError::PersistenceError("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
