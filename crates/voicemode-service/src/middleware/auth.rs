//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, authenticates it
//! with the configured `Authenticator`, and injects the resulting `Claims`
//! into request extensions. Rejection happens before the handler runs, so no
//! body parsing or upstream call happens for unauthenticated callers.

use crate::auth::Authenticator;
use crate::errors::VmError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
}

fn extract_bearer_token(req: &Request) -> Result<&str, VmError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "vm.middleware.auth", "Missing Authorization header");
            VmError::InvalidToken("Missing Authorization header".to_string())
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::debug!(target: "vm.middleware.auth", "Invalid Authorization header format");
            VmError::InvalidToken("Invalid Authorization header format".to_string())
        })
}

/// Require a verified user on the wrapped routes.
///
/// # Response
///
/// - 401 Unauthorized if the token is missing or invalid
/// - 403 Forbidden if the caller is not a verified user
/// - Otherwise continues with `Claims` in request extensions
#[instrument(skip_all, name = "vm.middleware.auth")]
pub async fn require_verified_user(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, VmError> {
    let token = extract_bearer_token(&req)?;

    let claims = state.authenticator.authenticate(token).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Accepts exactly one token value and counts calls.
    struct StaticAuthenticator {
        accepted: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for StaticAuthenticator {
        async fn authenticate(&self, token: &str) -> Result<Claims, VmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token == self.accepted {
                Ok(Claims {
                    sub: "user-1".to_string(),
                    role: "user".to_string(),
                    exp: 0,
                    iat: 0,
                })
            } else {
                Err(VmError::InvalidToken("bad token".to_string()))
            }
        }
    }

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        claims.sub
    }

    fn app(authenticator: Arc<StaticAuthenticator>) -> Router {
        let state = Arc::new(AuthState { authenticator });
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state, require_verified_user))
    }

    fn request(auth: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method("GET").uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn authenticator() -> Arc<StaticAuthenticator> {
        Arc::new(StaticAuthenticator {
            accepted: "good",
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_auth_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AuthState>();
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let response = app(authenticator())
            .oneshot(request(Some("Bearer good")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected_without_authenticating() {
        let auth = authenticator();
        let response = app(auth.clone()).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let auth = authenticator();
        let response = app(auth.clone())
            .oneshot(request(Some("Basic Z29vZA==")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_bearer_is_rejected() {
        let response = app(authenticator())
            .oneshot(request(Some("Bearer ")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let response = app(authenticator())
            .oneshot(request(Some("Bearer bad")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("WWW-Authenticate"));
    }
}
