use axum::http::StatusCode;
use axum_core::response::{IntoResponse as AxumCoreIntoResponse, Response};

use crate::types::Endpoint;

/// Message returned to callers for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Structurally incomplete request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("keyMeta is empty for {0}")]
    MissingKeyMeta(Endpoint),
    #[error("request.keyMeta is empty for {0}")]
    MissingRequestKeyMeta(Endpoint),
    #[error("keyMeta.identifier is empty for {0}")]
    EmptyIdentifier(Endpoint),
    #[error("malformed request body for {endpoint}: {reason}")]
    MalformedBody { endpoint: Endpoint, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot use key {identifier} for {endpoint}")]
    Unauthorized {
        identifier: String,
        endpoint: Endpoint,
    },
    #[error("{0}")]
    Decoding(#[from] base64::DecodeError),
    #[error("signer failure: {0:#}")]
    Signer(anyhow::Error),
    #[error("unexpected fault: {0}")]
    Fault(String),
}

impl SigningError {
    /// Transport status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            SigningError::Validation(_)
            | SigningError::Unauthorized { .. }
            | SigningError::Decoding(_) => StatusCode::BAD_REQUEST,
            SigningError::Signer(_) | SigningError::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to hand back to the caller.
    ///
    /// Caller-caused failures are described in full; backend failures and
    /// contained faults are reduced to a fixed string.
    pub fn public_message(&self) -> String {
        match self.status() {
            StatusCode::BAD_REQUEST => format!("Bad request: {self}"),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl AxumCoreIntoResponse for SigningError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
