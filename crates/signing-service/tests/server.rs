use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use signing_service::{AppState, Config, SigningService, router};

fn test_state() -> AppState {
    let config = Config::from_json(
        &json!({
            "keys": [
                {"identifier": "key1", "algorithm": "secp256k1", "seed": "server-test-1"},
                {"identifier": "key2", "algorithm": "secp256k1", "seed": "server-test-2"},
            ],
            "keyUsages": [{"endpoint": "blob", "identifiers": ["key1"]}],
        })
        .to_string(),
    )
    .unwrap();
    let key_store = config.build_key_store().unwrap();
    AppState::new(SigningService::new(
        config.key_usage_policy(),
        Arc::new(key_store),
    ))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn healthcheck_returns_200() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Ok");
}

#[tokio::test]
async fn list_keys_returns_authorized_keys_only() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sig/blob/keys")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, json!({"keys": [{"identifier": "key1"}]}));
}

#[tokio::test]
async fn public_key_returns_pem() {
    let app = router(test_state());

    let response = app
        .oneshot(post_json("/v1/sig/blob/key", json!({"identifier": "key1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(
        body["key"]
            .as_str()
            .unwrap()
            .starts_with("-----BEGIN PUBLIC KEY-----")
    );
}

#[tokio::test]
async fn public_key_without_key_meta_returns_400() {
    let app = router(test_state());

    let response = app
        .oneshot(post_json("/v1/sig/blob/key", Value::Null))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Bad request: keyMeta is empty for blob"
    );
}

#[tokio::test]
async fn public_key_for_unlisted_key_returns_400() {
    let app = router(test_state());

    // key2 is loaded in the key store but not usable for blob
    let response = app
        .oneshot(post_json("/v1/sig/blob/key", json!({"identifier": "key2"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Bad request: cannot use key key2 for blob"
    );
}

#[tokio::test]
async fn sign_returns_201_with_signature() {
    let app = router(test_state());
    // base64 of SHA-256("hello")
    let digest = "LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=";

    let response = app
        .oneshot(post_json(
            "/v1/sig/blob/sign",
            json!({
                "keyMeta": {"identifier": "key1"},
                "digest": digest,
                "hashAlgorithm": "SHA256",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let signature = body["signature"].as_str().unwrap();
    assert!(!signature.is_empty());
    assert!(signing_service::codec::decode(signature).is_ok());
}

#[tokio::test]
async fn sign_with_invalid_digest_returns_400() {
    let app = router(test_state());

    let response = app
        .oneshot(post_json(
            "/v1/sig/blob/sign",
            json!({
                "keyMeta": {"identifier": "key1"},
                "digest": "not base64!",
                "hashAlgorithm": "SHA256",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.starts_with("Bad request: "));
}

#[tokio::test]
#[tracing_test::traced_test]
async fn sign_with_non_string_digest_returns_400_and_is_logged() {
    let app = router(test_state());

    let response = app
        .oneshot(post_json(
            "/v1/sig/blob/sign",
            json!({
                "keyMeta": {"identifier": "key1"},
                "digest": 5,
                "hashAlgorithm": "SHA256",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .starts_with("Bad request: malformed request body for blob: ")
    );
    logs_assert(|lines: &[&str]| {
        let records = lines
            .iter()
            .filter(|line| line.contains("PostSignBlob") && line.contains("st=400"))
            .count();
        if records == 1 {
            Ok(())
        } else {
            Err(format!("expected one access record, found {records}"))
        }
    });
}

#[tokio::test]
async fn sign_without_content_type_returns_400() {
    let app = router(test_state());
    let body = json!({
        "keyMeta": {"identifier": "key1"},
        "digest": "LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=",
        "hashAlgorithm": "SHA256",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/sig/blob/sign")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .starts_with("Bad request: malformed request body for blob: ")
    );
}

#[tokio::test]
#[tracing_test::traced_test]
async fn public_key_with_unparsable_body_returns_400_and_is_logged() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/sig/blob/key")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .starts_with("Bad request: malformed request body for blob: ")
    );
    assert!(logs_contain("GetBlobSigningKey"));
    assert!(logs_contain("st=400"));
}

#[tokio::test]
async fn backend_failure_returns_generic_500() {
    let app = router(test_state());

    // "hello" itself is too short to be a secp256k1 prehash
    let response = app
        .oneshot(post_json(
            "/v1/sig/blob/sign",
            json!({
                "keyMeta": {"identifier": "key1"},
                "digest": "aGVsbG8=",
                "hashAlgorithm": "SHA256",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal server error");
}

#[tokio::test]
async fn unknown_endpoint_returns_400() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sig/x509/keys")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
