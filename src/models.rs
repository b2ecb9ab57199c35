//! Data models read through the tenant router.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::tenancy::EntityKind;

// ---

/// Row types readable through the router; `KIND` picks the backend.
pub trait Entity {
    const KIND: EntityKind;
}

/// Country reference data, shared by every tenant.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Country {
    // ---
    pub id: Uuid,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;
}

/// Tenant-tunable calculation parameter.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConfigurationVariable {
    // ---
    pub id: i32,
    pub name: String,
    pub value: f64,
    pub is_percent: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ConfigurationVariable {
    const KIND: EntityKind = EntityKind::ConfigurationVariable;
}

impl ConfigurationVariable {
    // ---
    /// Value to calculate with: percentages are stored as `0..=100` and
    /// returned as fractions.
    pub fn effective_value(&self) -> f64 {
        // ---
        if self.is_percent {
            self.value / 100.0
        } else {
            self.value
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::tenancy::EntityScope;

    fn variable(value: f64, is_percent: bool) -> ConfigurationVariable {
        // ---
        ConfigurationVariable {
            id: 1,
            name: "delta_t_threshold".to_string(),
            value,
            is_percent,
            updated_at: None,
        }
    }

    #[test]
    fn test_effective_value() {
        // ---
        assert_eq!(variable(25.0, true).effective_value(), 0.25);
        assert_eq!(variable(25.0, false).effective_value(), 25.0);
    }

    #[test]
    fn test_entity_kinds() {
        // ---
        assert_eq!(Country::KIND.scope(), EntityScope::Master);
        assert_eq!(ConfigurationVariable::KIND.scope(), EntityScope::Tenant);
    }
}
