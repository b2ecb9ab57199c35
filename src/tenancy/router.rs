//! Database routing policy.
//!
//! Every entity kind declares whether it lives in the shared backend
//! ([`EntityScope::Master`]), is partitioned per tenant
//! ([`EntityScope::Tenant`]) or belongs to the framework itself
//! ([`EntityScope::Framework`]). Combined with the tenant of the current
//! request this decides which physical backend serves a read or a write,
//! which cross-entity relations are allowed and where each table is created.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{context, TenantId, DEFAULT_BACKEND};

/// Where the rows of an entity kind live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityScope {
    // ---
    /// Stored once in the shared backend.
    Master,
    /// Stored in every tenant backend.
    Tenant,
    /// Owned by the framework; the router has no opinion about it.
    Framework,
}

/// Entity kinds known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    // ---
    Country,
    Site,
    Room,
    Row,
    Rack,
    Sensor,
    Event,
    EventSearch,
    Feedback,
    ConfigurationVariable,
    User,
    Session,
}

impl EntityKind {
    // ---
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Country,
        EntityKind::Site,
        EntityKind::Room,
        EntityKind::Row,
        EntityKind::Rack,
        EntityKind::Sensor,
        EntityKind::Event,
        EntityKind::EventSearch,
        EntityKind::Feedback,
        EntityKind::ConfigurationVariable,
        EntityKind::User,
        EntityKind::Session,
    ];

    pub fn scope(self) -> EntityScope {
        // ---
        match self {
            EntityKind::Country => EntityScope::Master,
            EntityKind::User | EntityKind::Session => EntityScope::Framework,
            EntityKind::Site
            | EntityKind::Room
            | EntityKind::Row
            | EntityKind::Rack
            | EntityKind::Sensor
            | EntityKind::Event
            | EntityKind::EventSearch
            | EntityKind::Feedback
            | EntityKind::ConfigurationVariable => EntityScope::Tenant,
        }
    }
}

// ---

/// Routing policy over the configured backends.
///
/// Decisions return `None` when the router has no opinion; callers then use
/// their own fallback (normally the shared backend).
#[derive(Debug, Clone)]
pub struct DatabaseRouter {
    // ---
    tenants: BTreeSet<String>,
}

impl DatabaseRouter {
    // ---
    /// Build a router over the given tenant aliases. The shared backend is
    /// always implied and is never a tenant.
    pub fn new<I, S>(tenant_aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // ---
        let tenants = tenant_aliases
            .into_iter()
            .map(Into::into)
            .filter(|alias: &String| !alias.is_empty() && alias != DEFAULT_BACKEND)
            .collect();
        Self { tenants }
    }

    pub fn is_tenant(&self, alias: &str) -> bool {
        self.tenants.contains(alias)
    }

    pub fn tenants(&self) -> impl Iterator<Item = &str> {
        self.tenants.iter().map(String::as_str)
    }

    /// Backend for reading `kind` while operating for `current`.
    pub fn route_for(&self, kind: EntityKind, current: &TenantId) -> Option<TenantId> {
        // ---
        let decision = match (kind.scope(), current) {
            (EntityScope::Master, TenantId::Default) => Some(TenantId::Default),
            (EntityScope::Tenant, TenantId::Named(_)) => Some(current.clone()),
            _ => None,
        };

        tracing::trace!(?kind, tenant = %current, ?decision, "route decision");
        decision
    }

    /// Backend for reading `kind` in the current request.
    pub fn route_read(&self, kind: EntityKind) -> Option<TenantId> {
        self.route_for(kind, &context::get_current())
    }

    /// Backend for writing `kind` in the current request.
    ///
    /// Writes follow exactly the same policy as reads.
    pub fn route_write(&self, kind: EntityKind) -> Option<TenantId> {
        self.route_for(kind, &context::get_current())
    }

    /// Whether rows of `a` may reference rows of `b` (or the reverse).
    ///
    /// Granted whenever either side is shared or tenant data; only relations
    /// between two framework-owned kinds are left to the storage layer.
    pub fn allow_relation(&self, a: EntityKind, b: EntityKind) -> bool {
        a.scope() != EntityScope::Framework || b.scope() != EntityScope::Framework
    }

    /// Whether the table of `kind` belongs in `backend`.
    pub fn allow_migrate(&self, backend: &str, kind: EntityKind) -> Option<bool> {
        // ---
        match kind.scope() {
            EntityScope::Master => Some(backend == DEFAULT_BACKEND),
            EntityScope::Tenant => Some(self.is_tenant(backend)),
            EntityScope::Framework => None,
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn router() -> DatabaseRouter {
        DatabaseRouter::new(["acme", "globex", "default", ""])
    }

    fn acme() -> TenantId {
        TenantId::Named("acme".into())
    }

    #[test]
    fn test_router_ignores_reserved_aliases() {
        // ---
        let router = router();
        assert_eq!(router.tenants().collect::<Vec<_>>(), vec!["acme", "globex"]);
        assert!(!router.is_tenant("default"));
    }

    #[test]
    fn test_master_entities_route_to_default_only_from_default_context() {
        // ---
        let router = router();
        assert_eq!(
            router.route_for(EntityKind::Country, &TenantId::Default),
            Some(TenantId::Default)
        );
        assert_eq!(router.route_for(EntityKind::Country, &acme()), None);
        assert_eq!(router.route_for(EntityKind::Country, &TenantId::Unresolved), None);
    }

    #[test]
    fn test_tenant_entities_route_to_current_tenant() {
        // ---
        let router = router();
        for kind in EntityKind::ALL
            .into_iter()
            .filter(|k| k.scope() == EntityScope::Tenant)
        {
            assert_eq!(router.route_for(kind, &acme()), Some(acme()));
            assert_eq!(router.route_for(kind, &TenantId::Default), None);
            assert_eq!(router.route_for(kind, &TenantId::Unresolved), None);
        }
    }

    #[test]
    fn test_framework_entities_have_no_opinion() {
        // ---
        let router = router();
        assert_eq!(router.route_for(EntityKind::User, &TenantId::Default), None);
        assert_eq!(router.route_for(EntityKind::Session, &acme()), None);
        assert_eq!(router.allow_migrate("default", EntityKind::User), None);
    }

    #[test]
    fn test_read_and_write_agree_and_are_idempotent() {
        // ---
        let router = router();
        for current in [TenantId::Default, acme(), TenantId::Unresolved] {
            context::sync_scope(current, || {
                for kind in EntityKind::ALL {
                    let first = router.route_read(kind);
                    assert_eq!(router.route_read(kind), first);
                    assert_eq!(router.route_write(kind), first);
                }
            });
        }
    }

    #[test]
    fn test_route_read_uses_ambient_context() {
        // ---
        let router = router();
        context::sync_scope(acme(), || {
            assert_eq!(router.route_read(EntityKind::Sensor), Some(acme()));
        });
        // Outside any request nothing is routed
        assert_eq!(router.route_read(EntityKind::Sensor), None);
    }

    #[test]
    fn test_allow_relation() {
        // ---
        let router = router();
        assert!(router.allow_relation(EntityKind::Site, EntityKind::Country));
        assert!(router.allow_relation(EntityKind::Country, EntityKind::Rack));
        assert!(router.allow_relation(EntityKind::Rack, EntityKind::Sensor));
        assert!(router.allow_relation(EntityKind::Sensor, EntityKind::Rack));
        assert!(router.allow_relation(EntityKind::User, EntityKind::Feedback));
    }

    #[test]
    fn test_allow_relation_between_framework_kinds() {
        // ---
        let router = router();
        assert!(!router.allow_relation(EntityKind::User, EntityKind::Session));
        assert!(!router.allow_relation(EntityKind::Session, EntityKind::Session));
    }

    #[test]
    fn test_allow_migrate() {
        // ---
        let router = router();
        assert_eq!(router.allow_migrate("default", EntityKind::Country), Some(true));
        assert_eq!(router.allow_migrate("acme", EntityKind::Country), Some(false));
        assert_eq!(router.allow_migrate("acme", EntityKind::Rack), Some(true));
        assert_eq!(router.allow_migrate("default", EntityKind::Rack), Some(false));
        assert_eq!(router.allow_migrate("unknown", EntityKind::Rack), Some(false));
    }
}
