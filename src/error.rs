/// Unified error types for the certificate portal
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the portal
///
/// `NotFound` and `VerificationFailed` are legitimate negative results of a
/// lookup, not failures; the presenter renders them as neutral status, never
/// as an error banner. `InvalidInput` blocks dispatch silently and is never
/// shown to the user.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Input that does not qualify as a query yet (non-numeric token id, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON-RPC transport or node errors
    #[error("Chain RPC error: {0}")]
    ChainRpc(String),

    /// Content-storage fetch errors (gateway or network)
    #[error("Metadata fetch error: {0}")]
    MetadataFetch(String),

    /// Backend API errors (non-2xx or unreachable)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Chain-confirmed absence after full settlement
    #[error("Not found: {0}")]
    NotFound(String),

    /// Explicit negative verdict from the backend verifier
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// Caller is not on the admin allow-list
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Configuration errors (missing or malformed environment)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert PortalError to HTTP response
impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            PortalError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            PortalError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            PortalError::VerificationFailed(_) => {
                (StatusCode::OK, "VerificationFailed", self.to_string())
            }
            PortalError::ChainRpc(_) | PortalError::MetadataFetch(_) | PortalError::Backend(_) => {
                (StatusCode::BAD_GATEWAY, "UpstreamUnavailable", self.to_string())
            }
            PortalError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", self.to_string()),
            PortalError::Config(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NotConfigured",
                self.to_string(),
            ),
            PortalError::Internal(_) | PortalError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for portal operations
pub type PortalResult<T> = Result<T, PortalError>;
