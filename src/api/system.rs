//! Unprefixed service routes: the authenticated welcome and the health check.

use super::{AppState, auth::AuthUser, response::ApiResponse};
use axum::{Router, extract::State, routing::get};
use serde::Serialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub user: String,
    pub version: String,
}

async fn root(State(state): State<AppState>, AuthUser(user): AuthUser) -> ApiResponse<Welcome> {
    ApiResponse::ok(
        format!("Welcome to {}", state.config.app_name),
        Welcome {
            user,
            version: state.config.app_version.clone(),
        },
    )
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

async fn health(State(state): State<AppState>) -> ApiResponse<Health> {
    ApiResponse::ok(
        "Application is healthy",
        Health {
            status: "healthy",
            version: state.config.app_version.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    )
}
