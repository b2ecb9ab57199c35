//! Tenant context routing.
//!
//! Gateway for the tenant modules (EMBP): path resolution, the request-scoped
//! tenant slot, the database routing policy and the middleware that ties
//! them to inbound requests.

mod context;
mod middleware;
mod router;
mod tenant;

pub use context::{get_current, scope, set_current, sync_scope};
pub use middleware::tenant_scope;
pub use router::{DatabaseRouter, EntityKind, EntityScope};
pub use tenant::{resolve, resolve_opt, TenantId, DEFAULT_BACKEND, RESERVED_SEGMENTS};
