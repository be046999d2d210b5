use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{EntityId, UNKNOWN};

/// Category name → id snapshot, read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLookup {
    by_name: HashMap<String, EntityId>,
}

impl CategoryLookup {
    pub fn new(by_name: HashMap<String, EntityId>) -> Self {
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Manufacturer name → id snapshot.
///
/// A lookup that reaches extraction always carries an [`UNKNOWN`] entry;
/// see [`ManufacturerLookup::with_unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerLookup {
    by_name: HashMap<String, EntityId>,
    unknown_id: EntityId,
}

impl ManufacturerLookup {
    /// Returns `None` when the map has no "Unknown" entry.
    pub fn with_unknown(by_name: HashMap<String, EntityId>) -> Option<Self> {
        let unknown_id = *by_name.get(UNKNOWN)?;
        Some(Self { by_name, unknown_id })
    }

    pub fn resolve(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn resolve_or_unknown(&self, name: &str) -> EntityId {
        self.resolve(name).unwrap_or(self.unknown_id)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewManufacturer {
    pub name: String,
    pub description: Option<String>,
}

impl NewManufacturer {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            description: Some("Unknown Manufacturer".to_string()),
        }
    }
}
