// src/routes/health.rs
//! API health check endpoint for the facility backend.
//!
//! This module defines the `/health` route used by container orchestrators
//! (e.g., Docker, Kubernetes) and CI pipelines to verify that the service is
//! running and able to respond to HTTP requests. It is a sibling module in the
//! `routes` directory and follows the Explicit Module Boundary Pattern (EMBP):
//! - Internal to this file: endpoint handler(s) and related types
//! - Exports to the gateway (`mod.rs`): a subrouter containing the `/health` route
//!
//! The route is mounted outside the tenant scope: `health` is not a tenant.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Backends;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Number of configured backends, the shared one included.
    backends: usize,
}

/// Handle `GET /health`.
///
/// Reports the number of configured backends without opening a connection
/// to any of them.
async fn health(State(backends): State<Backends>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backends: backends.backend_count(),
    })
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<Backends> {
    Router::new().route("/health", get(health))
}
