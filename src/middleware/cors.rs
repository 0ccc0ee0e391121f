//! Cross-origin policy gate for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native mobile apps and server-to-server calls are not
//!   restricted by CORS.
//! - This middleware should be applied at the Router level (not inside handlers).
//!
//! Responsibility:
//! - Decide per request whether the calling origin may receive a cross-origin
//!   response, by exact match against the configured allow-list.
//! - Answer browser preflight (`OPTIONS`) requests without reaching handlers.
//!
//! Policy:
//! - Allow iff the `Origin` header equals one allow-list entry byte-for-byte.
//!   No wildcard, prefix, or case-insensitive matching, in any environment.
//! - An empty allow-list allows none (no CORS headers on any response).
//! - A denied origin gets no permissive header and no error body; the caller's
//!   browser enforces the denial.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply the origin gate to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(&config.cors_allowed_origins))
}

/// Build the gate from a static allow-list of exact origins.
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    let allow_origin =
        AllowOrigin::predicate(move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin));

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::layer;

    fn app(allowed: &[&str]) -> Router {
        let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(&allowed))
    }

    #[tokio::test]
    async fn listed_origin_is_echoed_back() {
        let res = app(&["http://localhost:3000"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_permissive_header() {
        let res = app(&["http://localhost:3000"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn matching_is_exact_not_prefix_or_case_insensitive() {
        for origin in [
            "http://localhost:3000/",
            "http://localhost:30001",
            "HTTP://LOCALHOST:3000",
        ] {
            let res = app(&["http://localhost:3000"])
                .oneshot(
                    Request::builder()
                        .uri("/")
                        .header(header::ORIGIN, origin)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert!(
                res.headers()
                    .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .is_none(),
                "origin {origin:?} must not be allowed"
            );
        }
    }

    #[tokio::test]
    async fn empty_allow_list_allows_none() {
        let res = app(&[])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn preflight_terminates_with_success_and_no_body() {
        let res = app(&["http://localhost:3000"])
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );

        let body = to_bytes(res.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }
}
