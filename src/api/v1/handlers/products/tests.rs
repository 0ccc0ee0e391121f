//! Router-level tests for the /products authorization matrix and the fixed
//! unsupported-verb rejections.
//!
//! These drive the real v1 Router with `oneshot`. The pool in the test state
//! is lazy and never connected, so every request exercised here must be
//! answered before any store call would run.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use tower::ServiceExt;

use crate::api;
use crate::test_support::{test_state, token};

fn app() -> Router {
    let state = test_state();
    Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}

async fn send(method: Method, uri: &str, bearer: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let res = app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let body = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

const USER: &str = "2c38a9a5-4f86-44cb-bfc9-a2305ff790f6";

#[tokio::test]
async fn collection_put_is_a_fixed_rejection_even_for_admins() {
    let admin = token(USER, &["admin"]);
    let (status, body) = send(Method::PUT, "/api/v1/products", Some(&admin)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "PUT operation not supported on /products");
}

#[tokio::test]
async fn collection_delete_is_a_fixed_rejection_even_for_admins() {
    let admin = token(USER, &["admin"]);
    let (status, body) = send(Method::DELETE, "/api/v1/products", Some(&admin)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "DELETE operation not supported on /products");
}

#[tokio::test]
async fn single_resource_post_is_a_fixed_rejection_even_for_admins() {
    let admin = token(USER, &["admin"]);
    let (status, body) = send(Method::POST, "/api/v1/products/someid", Some(&admin)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "POST operation not supported on /products/someid");
}

#[tokio::test]
async fn collection_put_requires_admin() {
    // capability denial happens before the fixed-rejection handler
    let (status, _) = send(Method::PUT, "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let plain = token(USER, &[]);
    let (status, _) = send(Method::PUT, "/api/v1/products", Some(&plain)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_requires_authentication() {
    let (status, _) = send(Method::POST, "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_and_delete_require_authentication() {
    let (status, _) = send(Method::PUT, "/api/v1/products/someid", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(Method::DELETE, "/api/v1/products/someid", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn approve_requires_admin() {
    let (status, _) = send(Method::POST, "/api/v1/products/approve/someid", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let plain = token(USER, &[]);
    let (status, _) = send(Method::POST, "/api/v1/products/approve/someid", Some(&plain)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_public_id_is_rejected_before_the_store() {
    // authenticated DELETE with an id that cannot decode -> 400 from the
    // extractor (the lazy pool would fail any request that reached a query)
    let plain = token(USER, &[]);
    let (status, _) = send(Method::DELETE, "/api/v1/products/!!!", Some(&plain)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);
}
