//! Tenant identifiers and their resolution from request paths.

use std::fmt;

use serde::{Serialize, Serializer};

/// Alias of the shared backend holding master/reference data.
pub const DEFAULT_BACKEND: &str = "default";

/// First path segments that belong to the shared backend rather than a tenant.
pub const RESERVED_SEGMENTS: [&str; 3] = ["master", "docs", "auth"];

// ---

/// Which tenant the current request operates for.
///
/// The string form is `""` for [`TenantId::Unresolved`], `"default"` for
/// [`TenantId::Default`] and the tenant alias otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TenantId {
    // ---
    /// No tenant could be determined.
    #[default]
    Unresolved,

    /// The shared/master backend.
    Default,

    /// A tenant with its own backend.
    Named(String),
}

impl TenantId {
    // ---
    /// Build a tenant id from its string form.
    pub fn from_alias(alias: &str) -> Self {
        // ---
        match alias {
            "" => TenantId::Unresolved,
            DEFAULT_BACKEND => TenantId::Default,
            other => TenantId::Named(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        // ---
        match self {
            TenantId::Unresolved => "",
            TenantId::Default => DEFAULT_BACKEND,
            TenantId::Named(name) => name,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, TenantId::Default)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TenantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolve the tenant a request path belongs to.
///
/// The first non-empty path segment decides: reserved segments map to the
/// shared backend, anything else is taken verbatim as the tenant alias.
/// A path without any segment resolves to [`TenantId::Unresolved`]; this
/// function never fails.
///
/// ```
/// use codemetal_facility::tenancy::{resolve, TenantId};
///
/// assert_eq!(resolve("/master/countries"), TenantId::Default);
/// assert_eq!(resolve("/acme/core/table/"), TenantId::Named("acme".into()));
/// assert_eq!(resolve(""), TenantId::Unresolved);
/// ```
pub fn resolve(path: &str) -> TenantId {
    // ---
    let path = path.split(['?', '#']).next().unwrap_or_default();

    match path.split('/').find(|segment| !segment.is_empty()) {
        None => TenantId::Unresolved,
        Some(segment) if RESERVED_SEGMENTS.contains(&segment) => TenantId::Default,
        Some(segment) => TenantId::from_alias(segment),
    }
}

/// [`resolve`] for callers that may not have a path at all.
pub fn resolve_opt(path: Option<&str>) -> TenantId {
    path.map(resolve).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_reserved_segments_resolve_to_default() {
        // ---
        for path in ["/master/admin/", "/docs/", "/auth/token/refresh/", "master"] {
            assert_eq!(resolve(path), TenantId::Default, "path {path}");
        }
    }

    #[test]
    fn test_other_segments_resolve_verbatim() {
        // ---
        assert_eq!(resolve("/acme/core/feedbacks/"), TenantId::Named("acme".into()));
        assert_eq!(resolve("//globex/admin"), TenantId::Named("globex".into()));
        assert_eq!(resolve("/Master/x"), TenantId::Named("Master".into()));
        assert_eq!(resolve("/acme?page=2"), TenantId::Named("acme".into()));
    }

    #[test]
    fn test_default_segment_is_shared_backend() {
        // ---
        assert_eq!(resolve("/default/core"), TenantId::Default);
    }

    #[test]
    fn test_unresolvable_paths() {
        // ---
        assert_eq!(resolve(""), TenantId::Unresolved);
        assert_eq!(resolve("/"), TenantId::Unresolved);
        assert_eq!(resolve("///"), TenantId::Unresolved);
        assert_eq!(resolve("/?x=1"), TenantId::Unresolved);
        assert_eq!(resolve_opt(None), TenantId::Unresolved);
        assert_eq!(resolve_opt(Some("/auth")), TenantId::Default);
    }

    #[test]
    fn test_string_forms() {
        // ---
        assert_eq!(TenantId::Unresolved.as_str(), "");
        assert_eq!(TenantId::Default.to_string(), "default");
        assert_eq!(TenantId::from_alias("acme").as_str(), "acme");
        assert_eq!(
            serde_json::to_string(&TenantId::Named("acme".into())).unwrap(),
            "\"acme\""
        );
    }
}
