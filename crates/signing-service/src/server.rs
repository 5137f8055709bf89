use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::SigningError;
use crate::service::{Operation, SigningService};
use crate::types::{Endpoint, KeyMeta, KeyMetas, PublicKey, Signature, SigningRequest};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SigningService>,
}

impl AppState {
    pub fn new(service: SigningService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(|| async move { (StatusCode::OK, "Ok").into_response() }))
        .route("/v1/sig/{endpoint}/keys", get(list_keys_handler))
        .route("/v1/sig/{endpoint}/key", post(public_key_handler))
        .route("/v1/sig/{endpoint}/sign", post(sign_handler))
        .with_state(state)
}

/// Serves until ctrl-c.
pub async fn run(host: &str, port: u16, state: AppState) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "signing service listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving signing API")?;

    info!("signing service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn list_keys_handler(
    State(state): State<AppState>,
    Path(endpoint): Path<Endpoint>,
) -> Result<Json<KeyMetas>, SigningError> {
    let keys = state.service.list_available_keys(endpoint).await?;
    Ok(Json(keys))
}

// The token is cancelled when the handler future is dropped, e.g. on client disconnect.
async fn public_key_handler(
    State(state): State<AppState>,
    Path(endpoint): Path<Endpoint>,
    body: Result<Json<Option<KeyMeta>>, JsonRejection>,
) -> Result<Json<PublicKey>, SigningError> {
    let Json(key_meta) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return Err(state
                .service
                .reject_malformed_body(endpoint, Operation::PublicKey, rejection.body_text())
                .await);
        }
    };
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let key = state
        .service
        .get_signing_public_key(endpoint, key_meta, &cancel)
        .await?;
    Ok(Json(key))
}

async fn sign_handler(
    State(state): State<AppState>,
    Path(endpoint): Path<Endpoint>,
    body: Result<Json<SigningRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Signature>), SigningError> {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return Err(state
                .service
                .reject_malformed_body(endpoint, Operation::Sign, rejection.body_text())
                .await);
        }
    };
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let signature = state.service.sign_digest(endpoint, request, &cancel).await?;
    Ok((StatusCode::CREATED, Json(signature)))
}
