//! HTTP API layer.
//!
//! Axum routers and handlers under `/api/v1`, plus unauthenticated
//! `/health` and `/metrics`. All handlers return
//! `Result<impl IntoResponse, AdminError>` so failures convert to HTTP
//! responses through the `IntoResponse` impl on `AdminError`.
//!
//! Every write handler follows the same sequence: session, role from
//! claims, permission predicate, payload validation, assignable-role check
//! where a role is granted, uniqueness handling, single store mutation,
//! response shaping with the password hash stripped.

pub mod auth;
pub mod courses;
pub mod import;
pub mod providers;
pub mod users;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionManager;
use crate::db::Database;
use crate::middleware::AuthLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionManager>,
    pub metrics: PrometheusHandle,
}

/// API response wrapper.
#[derive(serde::Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_layer = AuthLayer::new(state.sessions.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api/v1", v1_router())
        .layer(auth_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", axum::routing::patch(users::update_user))
        .route("/users/:id/reset-password", post(users::reset_password))
        .route("/users/import", post(import::import_users))
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/:id",
            axum::routing::patch(courses::update_course).delete(courses::delete_course),
        )
        .route(
            "/providers",
            get(providers::list_providers).post(providers::create_provider),
        )
        .route(
            "/providers/:id",
            axum::routing::patch(providers::update_provider).delete(providers::delete_provider),
        )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Unauthenticated Endpoints
// ═══════════════════════════════════════════════════════════════════════════════

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
