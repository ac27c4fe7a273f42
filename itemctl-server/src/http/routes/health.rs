//! Liveness endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Banner returned from the root path
#[derive(Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Items CRUD API is running!",
    })
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}
