// src/routes/context.rs
//! Routing introspection endpoint.
//!
//! `GET /{tenant}/core/context` reports the tenant the request was resolved to
//! and, for every entity kind, the backend a read would be served from. It
//! touches no database and is meant for operators checking a deployment's
//! tenant wiring.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Backends;
use crate::tenancy::{self, EntityKind, EntityScope, TenantId, DEFAULT_BACKEND};

/// JSON response body for the context endpoint.
#[derive(Debug, Serialize)]
struct ContextResponse {
    tenant: TenantId,
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Serialize)]
struct RouteEntry {
    kind: EntityKind,
    scope: EntityScope,
    /// Backend alias, `default` when the router defers to the fallback.
    backend: String,
}

async fn context(State(backends): State<Backends>) -> Json<ContextResponse> {
    // ---
    let routes = EntityKind::ALL
        .into_iter()
        .map(|kind| RouteEntry {
            kind,
            scope: kind.scope(),
            backend: backends
                .router()
                .route_read(kind)
                .map_or_else(|| DEFAULT_BACKEND.to_string(), |t| t.to_string()),
        })
        .collect();

    Json(ContextResponse {
        tenant: tenancy::get_current(),
        routes,
    })
}

pub fn router() -> Router<Backends> {
    Router::new().route("/{tenant}/core/context", get(context))
}
