use axum::{middleware, Router};

use crate::db::Backends;
use crate::tenancy::tenant_scope;

mod configuration;
mod context;
mod estimates;
mod health;
mod master;

// ---

/// Build the API router.
///
/// Tenant and master routes run inside the tenant scope opened by
/// [`tenant_scope`]; `/health` stays outside so it never depends on the path
/// naming a tenant.
pub fn router(backends: Backends) -> Router {
    // ---
    let scoped = Router::new()
        .merge(context::router())
        .merge(configuration::router())
        .merge(estimates::router())
        .merge(master::router())
        .route_layer(middleware::from_fn_with_state(
            backends.router().clone(),
            tenant_scope,
        ));

    Router::new()
        .merge(scoped)
        .merge(health::router())
        .with_state(backends)
}
