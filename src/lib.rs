//! Core of the `codemetal-facility` backend.
//!
//! Two independent pieces used on every request:
//! - [`tenancy`] resolves the tenant from the request path, keeps it in a
//!   request-scoped slot and routes each data access to that tenant's
//!   database (or the shared one).
//! - [`estimation`] estimates sensor-derived values at unmeasured positions
//!   with Inverse Distance Weighting, plus outlier and trend statistics.
//!
//! [`db`] and [`routes`] wire both into the HTTP service started by the
//! binary. Module layout follows the Explicit Module Boundary Pattern (EMBP):
//! each directory module is a gateway re-exporting its public surface.

pub mod config;
pub mod db;
pub mod estimation;
pub mod models;
pub mod routes;
pub mod tenancy;

pub use config::Config;
pub use db::Backends;
