use std::convert::Infallible;
use std::sync::Arc;

use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::codec;
use crate::error::{SigningError, ValidationError};
use crate::hash::HashAlgorithm;
use crate::observe::Call;
use crate::policy::KeyUsagePolicy;
use crate::signing::Signer;
use crate::types::{Endpoint, KeyMeta, KeyMetas, PublicKey, Signature, SigningRequest};
use crate::validation::{validate_key_meta, validate_signing_request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListKeys,
    PublicKey,
    Sign,
}

impl Operation {
    fn success_status(self) -> StatusCode {
        match self {
            Operation::ListKeys | Operation::PublicKey => StatusCode::OK,
            Operation::Sign => StatusCode::CREATED,
        }
    }
}

/// Name under which an operation shows up in the access log.
fn method_name(endpoint: Endpoint, operation: Operation) -> &'static str {
    match (endpoint, operation) {
        (Endpoint::Blob, Operation::ListKeys) => "GetBlobAvailableSigningKeys",
        (Endpoint::Blob, Operation::PublicKey) => "GetBlobSigningKey",
        (Endpoint::Blob, Operation::Sign) => "PostSignBlob",
    }
}

/// Request pipeline in front of the key-holding [`Signer`].
///
/// Each call is validated, checked against the key usage policy, decoded
/// and only then handed to the signer. Calls fail fast on the first
/// failing stage and are never retried.
pub struct SigningService {
    policy: KeyUsagePolicy,
    signer: Arc<dyn Signer>,
}

impl SigningService {
    pub fn new(policy: KeyUsagePolicy, signer: Arc<dyn Signer>) -> Self {
        Self { policy, signer }
    }

    /// Keys the endpoint may sign with, sorted by identifier.
    pub async fn list_available_keys(&self, endpoint: Endpoint) -> Result<KeyMetas, SigningError> {
        Call::new(method_name(endpoint, Operation::ListKeys), Operation::ListKeys.success_status())
            .observe(async {
                let keys = self
                    .policy
                    .list_keys(endpoint)
                    .into_iter()
                    .map(KeyMeta::new)
                    .collect();
                Ok(KeyMetas { keys })
            })
            .await
    }

    pub async fn get_signing_public_key(
        &self,
        endpoint: Endpoint,
        key_meta: Option<KeyMeta>,
        cancel: &CancellationToken,
    ) -> Result<PublicKey, SigningError> {
        Call::new(method_name(endpoint, Operation::PublicKey), Operation::PublicKey.success_status())
            .observe(self.public_key_inner(endpoint, key_meta.as_ref(), cancel))
            .await
    }

    /// Signs the request's digest. The digest and hash name are logged as sent.
    pub async fn sign_digest(
        &self,
        endpoint: Endpoint,
        request: SigningRequest,
        cancel: &CancellationToken,
    ) -> Result<Signature, SigningError> {
        Call::new(method_name(endpoint, Operation::Sign), Operation::Sign.success_status())
            .with_request(request.digest.as_str(), request.hash_algorithm.as_str())
            .observe(self.sign_inner(endpoint, &request, cancel))
            .await
    }

    /// Fails a call whose request body could not be parsed.
    ///
    /// The failure is logged like any other invalid-argument call.
    pub async fn reject_malformed_body(
        &self,
        endpoint: Endpoint,
        operation: Operation,
        reason: impl Into<String>,
    ) -> SigningError {
        let error = SigningError::from(ValidationError::MalformedBody {
            endpoint,
            reason: reason.into(),
        });
        let result = Call::new(method_name(endpoint, operation), operation.success_status())
            .observe(async move { Err::<Infallible, SigningError>(error) })
            .await;
        match result {
            Ok(never) => match never {},
            Err(err) => err,
        }
    }

    async fn public_key_inner(
        &self,
        endpoint: Endpoint,
        key_meta: Option<&KeyMeta>,
        cancel: &CancellationToken,
    ) -> Result<PublicKey, SigningError> {
        let key_meta = validate_key_meta(endpoint, key_meta)?;
        self.authorize(endpoint, &key_meta.identifier)?;

        let key = self
            .signer
            .public_key(cancel, &key_meta.identifier)
            .await
            .map_err(SigningError::Signer)?;
        let key = String::from_utf8(key)
            .map_err(|e| SigningError::Signer(anyhow::anyhow!("public key is not UTF-8: {e}")))?;
        Ok(PublicKey { key })
    }

    async fn sign_inner(
        &self,
        endpoint: Endpoint,
        request: &SigningRequest,
        cancel: &CancellationToken,
    ) -> Result<Signature, SigningError> {
        let key_meta = validate_signing_request(endpoint, request)?;
        self.authorize(endpoint, &key_meta.identifier)?;

        let digest = codec::decode(&request.digest)?;
        let hash = HashAlgorithm::resolve(&request.hash_algorithm);

        let signature = self
            .signer
            .sign(cancel, &digest, hash, &key_meta.identifier)
            .await
            .map_err(SigningError::Signer)?;
        Ok(Signature {
            signature: codec::encode(&signature),
        })
    }

    fn authorize(&self, endpoint: Endpoint, identifier: &str) -> Result<(), SigningError> {
        if !self.policy.is_authorized(endpoint, identifier) {
            return Err(SigningError::Unauthorized {
                identifier: identifier.to_string(),
                endpoint,
            });
        }
        Ok(())
    }
}
