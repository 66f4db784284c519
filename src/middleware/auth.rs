//! Session-validating middleware.
//!
//! A Tower layer that checks the Bearer token on every request outside the
//! public path list, verifies it through the [`SessionManager`], and injects
//! the claims into request extensions as [`CurrentUser`]. Handlers receive
//! the acting identity through the extractor; the role is read from the
//! claims, never re-fetched from the store.

use crate::auth::{Claims, SessionManager};
use crate::error::AdminError;
use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Paths served without a session.
const PUBLIC_PATHS: [&str; 3] = ["/health", "/metrics", "/api/v1/auth/login"];

fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Claims of the acting user, injected by the auth layer.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer and Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication layer for Tower.
#[derive(Clone)]
pub struct AuthLayer {
    sessions: Arc<SessionManager>,
}

impl AuthLayer {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            sessions: self.sessions.clone(),
        }
    }
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    sessions: Arc<SessionManager>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let sessions = self.sessions.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public_path(request.uri().path()) {
                return inner.call(request).await;
            }

            let token = match bearer_token(&request) {
                Some(token) => token,
                None => {
                    return Ok(AdminError::unauthorized("missing bearer token").into_response());
                }
            };

            match sessions.verify(&token) {
                Ok(claims) => {
                    request.extensions_mut().insert(CurrentUser(claims));
                    inner.call(request).await
                }
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Extractor
// ═══════════════════════════════════════════════════════════════════════════════

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AdminError::unauthorized("no session in request extensions"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::Role;
    use axum::http::StatusCode;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn sessions() -> Arc<SessionManager> {
        Arc::new(SessionManager::new("test-secret-at-least-32-bytes-long", 12))
    }

    async fn ok_handler(_req: Request<Body>) -> Result<Response, std::convert::Infallible> {
        Ok(StatusCode::OK.into_response())
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let svc = AuthLayer::new(sessions()).layer(tower::service_fn(ok_handler));
        let request = Request::builder()
            .uri("/api/v1/users")
            .body(Body::empty())
            .unwrap();
        let response = svc.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_path_passes_without_token() {
        let svc = AuthLayer::new(sessions()).layer(tower::service_fn(ok_handler));
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = svc.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let sessions = sessions();
        let token = sessions
            .issue(Uuid::new_v4(), "1234567", Role::HrLine, "Анна", "Петрова")
            .unwrap();
        let svc = AuthLayer::new(sessions).layer(tower::service_fn(ok_handler));
        let request = Request::builder()
            .uri("/api/v1/users")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = svc.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/metrics"));
        assert!(is_public_path("/api/v1/auth/login"));
        assert!(!is_public_path("/api/v1/users"));
        assert!(!is_public_path("/api/v1/auth/login/other"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = Request::builder()
            .uri("/api/v1/users")
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));

        let request = Request::builder()
            .uri("/api/v1/users")
            .header(header::AUTHORIZATION, "Basic dXNlcg==")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_token(&request).is_none());
    }
}
