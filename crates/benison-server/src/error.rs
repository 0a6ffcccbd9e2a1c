//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use benison_biscuit::CredentialError;
use benison_exchange::ExchangeError;
use thiserror::Error;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A blessing exchange failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The signer's key could not be encoded.
    #[error("failed to encode signer key: {0}")]
    SignerKey(#[from] CredentialError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Exchange failures are not retryable and all map to one status.
        // The body carries only the stage message; detail is already logged.
        let status = match &self {
            ApiError::Exchange(_) | ApiError::SignerKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
