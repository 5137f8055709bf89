//! Per-call access logging and fault containment.
//!
//! Every operation runs inside [`Call::observe`]. One access record is
//! written per call from a drop guard, so it is emitted on success, on a
//! mapped error, after a contained panic, and when the caller drops the
//! call before it finishes.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::http::StatusCode;
use futures::FutureExt;
use tracing::{error, info};

use crate::error::SigningError;

/// Target of the access records.
pub const ACCESS_TARGET: &str = "signing_service::access";

const INCOMPLETE_CALL: &str = "call did not complete";

/// Describes one call for its access record.
#[derive(Debug, Clone)]
pub struct Call {
    method: &'static str,
    success: StatusCode,
    request: Option<RequestFields>,
}

/// Signing request fields, logged as supplied by the caller.
#[derive(Debug, Clone)]
struct RequestFields {
    digest: String,
    hash: String,
}

impl Call {
    pub fn new(method: &'static str, success: StatusCode) -> Self {
        Self {
            method,
            success,
            request: None,
        }
    }

    /// Adds the raw digest text and hash name to the record.
    pub fn with_request(mut self, digest: impl Into<String>, hash: impl Into<String>) -> Self {
        self.request = Some(RequestFields {
            digest: digest.into(),
            hash: hash.into(),
        });
        self
    }

    /// Runs `call`, containing any panic it raises.
    ///
    /// A panic becomes [`SigningError::Fault`] carrying the panic message.
    pub async fn observe<T, F>(self, call: F) -> Result<T, SigningError>
    where
        F: Future<Output = Result<T, SigningError>>,
    {
        let success = self.success;
        let mut record = AccessRecord {
            call: self,
            start: Instant::now(),
            outcome: None,
        };

        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(SigningError::Fault(panic_message(payload.as_ref()))),
        };

        record.outcome = Some(match &result {
            Ok(_) => (success, String::new()),
            Err(err) => (err.status(), err.to_string()),
        });
        result
    }
}

struct AccessRecord {
    call: Call,
    start: Instant,
    outcome: Option<(StatusCode, String)>,
}

impl Drop for AccessRecord {
    fn drop(&mut self) {
        let (status, err) = self
            .outcome
            .take()
            .unwrap_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, INCOMPLETE_CALL.to_string()));
        let m = self.call.method;
        let st = status.as_u16();
        let et = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);

        // Internal failures go out at error level with their full detail.
        match (&self.call.request, status.is_server_error()) {
            (Some(request), false) => info!(
                target: ACCESS_TARGET,
                m, digest = ?request.digest, hash = ?request.hash, st, et, err = ?err
            ),
            (Some(request), true) => error!(
                target: ACCESS_TARGET,
                m, digest = ?request.digest, hash = ?request.hash, st, et, err = ?err
            ),
            (None, false) => info!(target: ACCESS_TARGET, m, st, et, err = ?err),
            (None, true) => error!(target: ACCESS_TARGET, m, st, et, err = ?err),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
