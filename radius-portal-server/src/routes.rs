//! HTTP routes.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use radius_portal::{AuthorizationPolicy, Client};

pub mod login;

/// State shared by all requests: the RADIUS client and the authorization policy.
///
/// Both are read-only, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub(crate) client: Client,
    pub(crate) policy: Arc<AuthorizationPolicy>,
}

impl AppState {
    /// Bundles a client & policy for use by the router.
    pub fn new(client: Client, policy: AuthorizationPolicy) -> Self {
        Self {
            client,
            policy: Arc::new(policy),
        }
    }
}

/// Liveness status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Always `ok` while the server is running.
    pub status: &'static str,
}

/// Liveness check handler.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Builds the router serving the login API.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(login::login))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
