//! Structural checks on inbound requests.

use crate::error::ValidationError;
use crate::types::{Endpoint, KeyMeta, SigningRequest};

/// Checks a bare key reference, as sent to the public key lookup.
pub fn validate_key_meta(
    endpoint: Endpoint,
    key_meta: Option<&KeyMeta>,
) -> Result<&KeyMeta, ValidationError> {
    let key_meta = key_meta.ok_or(ValidationError::MissingKeyMeta(endpoint))?;
    check_identifier(endpoint, key_meta)
}

/// Checks a signing request and returns its key reference.
pub fn validate_signing_request(
    endpoint: Endpoint,
    request: &SigningRequest,
) -> Result<&KeyMeta, ValidationError> {
    let key_meta = request
        .key_meta
        .as_ref()
        .ok_or(ValidationError::MissingRequestKeyMeta(endpoint))?;
    check_identifier(endpoint, key_meta)
}

fn check_identifier(endpoint: Endpoint, key_meta: &KeyMeta) -> Result<&KeyMeta, ValidationError> {
    if key_meta.identifier.is_empty() {
        return Err(ValidationError::EmptyIdentifier(endpoint));
    }
    Ok(key_meta)
}
