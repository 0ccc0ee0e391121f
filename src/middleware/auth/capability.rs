//! Capability guard: the enforcement half of the authorization matrix.
//!
//! Each route declares the minimum capability it requires (`public`,
//! `authenticated`, `admin`). A capability expands to an ordered list of
//! predicate checks that run in front of the handler; the first failing check
//! stops the chain with a denial and the handler never runs.
//!
//! - `user`: extract the bearer token, verify it through `AuthService`, and
//!   store the resulting `AuthCtx` in request extensions (handlers read it
//!   via the `AuthCtxExtractor`).
//! - `admin`: require the previously-stored context to carry the admin role.
//!
//! `admin` always implies `user` ran first, so the admin check can rely on
//! the context being present.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    User,
    Admin,
}

impl Capability {
    /// Ordered predicate checks for this capability.
    pub const fn checks(self) -> &'static [Check] {
        match self {
            Capability::Public => &[],
            Capability::Authenticated => &[Check::User],
            Capability::Admin => &[Check::User, Check::Admin],
        }
    }
}

/// Middleware body for `axum::middleware::from_fn_with_state`.
///
/// Wire it per route group:
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(
///     (state.clone(), Capability::Admin),
///     capability::guard,
/// ))
/// ```
pub async fn guard(
    State((state, capability)): State<(AppState, Capability)>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    for check in capability.checks() {
        match check {
            Check::User => {
                let ctx = verify_user(&state, &req)?;
                req.extensions_mut().insert(ctx);
            }
            Check::Admin => {
                let ctx = req
                    .extensions()
                    .get::<AuthCtx>()
                    .ok_or(AppError::Unauthorized)?;
                verify_admin(ctx)?;
            }
        }
    }

    Ok(next.run(req).await)
}

fn verify_user(state: &AppState, req: &Request<Body>) -> Result<AuthCtx, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let verified = match state.auth.verify_verified(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = ?err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    Ok(AuthCtx::new(verified.user_id, verified.roles))
}

fn verify_admin(ctx: &AuthCtx) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    use super::{Capability, Check, guard};
    use crate::test_support::{test_state, token};

    #[test]
    fn admin_expands_to_user_then_admin() {
        assert_eq!(Capability::Public.checks(), &[]);
        assert_eq!(Capability::Authenticated.checks(), &[Check::User]);
        assert_eq!(Capability::Admin.checks(), &[Check::User, Check::Admin]);
    }

    fn guarded(capability: Capability) -> Router {
        let state = test_state();
        Router::new()
            .route("/", get(|| async { "reached" }))
            .route_layer(from_fn_with_state((state.clone(), capability), guard))
            .with_state(state)
    }

    async fn status_for(capability: Capability, bearer: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri("/");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let res = guarded(capability)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        res.status()
    }

    #[tokio::test]
    async fn public_routes_run_without_a_token() {
        assert_eq!(status_for(Capability::Public, None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        assert_eq!(
            status_for(Capability::Authenticated, None).await,
            StatusCode::UNAUTHORIZED
        );
        // admin routes run the user check first
        assert_eq!(
            status_for(Capability::Admin, None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        assert_eq!(
            status_for(Capability::Authenticated, Some("not-a-jwt")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn authenticated_token_passes_user_check() {
        let token = token("2c38a9a5-4f86-44cb-bfc9-a2305ff790f6", &[]);
        assert_eq!(
            status_for(Capability::Authenticated, Some(&token)).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn non_admin_on_admin_route_is_forbidden() {
        let token = token("2c38a9a5-4f86-44cb-bfc9-a2305ff790f6", &[]);
        assert_eq!(
            status_for(Capability::Admin, Some(&token)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn admin_role_passes_both_checks() {
        let token = token("2c38a9a5-4f86-44cb-bfc9-a2305ff790f6", &["admin"]);
        assert_eq!(
            status_for(Capability::Admin, Some(&token)).await,
            StatusCode::OK
        );
    }
}
