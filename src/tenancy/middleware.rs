//! Request-entry middleware that opens the tenant scope.
//!
//! Resolves the tenant from the request path and runs the rest of the request
//! inside a fresh [`context::scope`], so every data-access call made while
//! handling the request sees the same tenant without it being passed around.
//! Paths naming a tenant that has no configured backend are answered with
//! `404 Not Found` before any handler runs.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use super::{context, resolve, DatabaseRouter, TenantId};

// ---

/// Axum middleware installing the tenant scope for one request.
///
/// ```ignore
/// let app = Router::new()
///     .route("/{tenant}/core/context", get(handler))
///     .route_layer(middleware::from_fn_with_state(router, tenant_scope));
/// ```
pub async fn tenant_scope(
    State(router): State<DatabaseRouter>,
    request: Request,
    next: Next,
) -> Response {
    // ---
    let tenant = resolve(request.uri().path());
    debug!(path = %request.uri().path(), tenant = %tenant, "Resolved tenant");

    if let TenantId::Named(alias) = &tenant {
        if !router.is_tenant(alias) {
            warn!("Request for unknown tenant '{}'", alias);
            return (StatusCode::NOT_FOUND, Json("Unknown tenant")).into_response();
        }
    }

    context::scope(tenant, next.run(request)).await
}
