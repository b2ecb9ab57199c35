//! Per-tenant database backends.
//!
//! Holds one PostgreSQL pool per backend alias (the shared `default` backend
//! plus every configured tenant) and picks the pool for each data access by
//! asking the [`DatabaseRouter`] about the tenant of the current request.
//! Call sites name only the entity kind they touch, never the tenant.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::tenancy::{DatabaseRouter, EntityKind, TenantId, DEFAULT_BACKEND};
use crate::Config;

mod schema;

pub use schema::create_schema;

// ---

/// Connection pools of all backends plus the routing policy over them.
#[derive(Debug, Clone)]
pub struct Backends {
    // ---
    default: PgPool,
    tenants: Arc<BTreeMap<String, PgPool>>,
    router: DatabaseRouter,
}

impl Backends {
    // ---
    /// Connect to every configured backend, failing on the first that is
    /// unreachable.
    pub async fn connect(cfg: &Config) -> Result<Self> {
        // ---
        let options = || PgPoolOptions::new().max_connections(cfg.db_pool_max);

        let default = options()
            .connect(&cfg.db_url)
            .await
            .map_err(|e| anyhow!("Failed to connect to the default database: {}", e))?;

        let mut tenants = BTreeMap::new();
        for tenant in &cfg.tenants {
            let pool = options().connect(&tenant.url).await.map_err(|e| {
                anyhow!("Failed to connect to tenant database '{}': {}", tenant.alias, e)
            })?;
            tracing::info!("Connected to tenant database '{}'", tenant.alias);
            tenants.insert(tenant.alias.clone(), pool);
        }

        Ok(Self::from_pools(default, tenants))
    }

    /// Build pools without opening any connection; connections are made on
    /// first use.
    pub fn connect_lazy(cfg: &Config) -> Result<Self> {
        // ---
        let options = || PgPoolOptions::new().max_connections(cfg.db_pool_max);

        let default = options()
            .connect_lazy(&cfg.db_url)
            .map_err(|e| anyhow!("Invalid default database url: {}", e))?;

        let mut tenants = BTreeMap::new();
        for tenant in &cfg.tenants {
            let pool = options()
                .connect_lazy(&tenant.url)
                .map_err(|e| anyhow!("Invalid database url for '{}': {}", tenant.alias, e))?;
            tenants.insert(tenant.alias.clone(), pool);
        }

        Ok(Self::from_pools(default, tenants))
    }

    fn from_pools(default: PgPool, tenants: BTreeMap<String, PgPool>) -> Self {
        // ---
        let router = DatabaseRouter::new(tenants.keys().cloned());
        Self {
            default,
            tenants: Arc::new(tenants),
            router,
        }
    }

    pub fn router(&self) -> &DatabaseRouter {
        &self.router
    }

    /// Number of backends, the shared one included.
    pub fn backend_count(&self) -> usize {
        self.tenants.len() + 1
    }

    /// Backend aliases, `default` first.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_BACKEND).chain(self.tenants.keys().map(String::as_str))
    }

    /// Pool of the backend called `alias`.
    pub fn using(&self, alias: &str) -> Option<&PgPool> {
        // ---
        if alias == DEFAULT_BACKEND {
            Some(&self.default)
        } else {
            self.tenants.get(alias)
        }
    }

    /// Pool to read `kind` from in the current request.
    pub fn for_read(&self, kind: EntityKind) -> Result<&PgPool> {
        self.pick(self.router.route_read(kind))
    }

    /// Pool to write `kind` to in the current request.
    pub fn for_write(&self, kind: EntityKind) -> Result<&PgPool> {
        self.pick(self.router.route_write(kind))
    }

    fn pick(&self, route: Option<TenantId>) -> Result<&PgPool> {
        // ---
        match route {
            None => Ok(&self.default),
            Some(tenant) => self
                .using(tenant.as_str())
                .ok_or_else(|| anyhow!("No database configured for tenant '{}'", tenant)),
        }
    }
}
