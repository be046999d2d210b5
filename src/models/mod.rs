use serde::{Deserialize, Serialize};

pub mod component;
pub mod lookup;
pub mod scrape_log;
pub mod source;

// Re-exports for convenience
pub use component::*;
pub use lookup::*;
pub use scrape_log::*;
pub use source::*;

/// Identifier type used by the lookup and storage collaborators.
pub type EntityId = i64;

/// Name of the fallback manufacturer and of the unclassified category.
pub const UNKNOWN: &str = "Unknown";

// Variant tag of a component
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Generic,
}

impl ComponentKind {
    /// Category name this kind is stored under.
    pub fn category_name(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "CPU",
            ComponentKind::Gpu => "GPU",
            ComponentKind::Motherboard => "Motherboard",
            ComponentKind::Ram => "RAM",
            ComponentKind::Storage => "Storage",
            ComponentKind::Generic => UNKNOWN,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_kind_serialization() {
        assert_eq!(serde_json::to_string(&ComponentKind::Cpu).unwrap(), "\"cpu\"");
        assert_eq!(serde_json::to_string(&ComponentKind::Generic).unwrap(), "\"generic\"");
        assert_eq!(
            serde_json::from_str::<ComponentKind>("\"motherboard\"").unwrap(),
            ComponentKind::Motherboard
        );
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ComponentKind::Ram.category_name(), "RAM");
        assert_eq!(ComponentKind::Generic.to_string(), "Unknown");
    }
}
