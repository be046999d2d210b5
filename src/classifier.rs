//! Keyword-based component classification and manufacturer resolution.

use serde::Serialize;

use crate::models::{ComponentKind, UNKNOWN};

/// One classification rule. A rule matches when the lower-cased name
/// contains any of `name_keywords`, or the lower-cased description
/// contains every keyword of at least one `description_all` group.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub kind: ComponentKind,
    pub name_keywords: &'static [&'static str],
    pub description_all: &'static [&'static [&'static str]],
}

impl ClassificationRule {
    pub fn matches(&self, name_lower: &str, description_lower: &str) -> bool {
        self.name_keywords.iter().any(|kw| name_lower.contains(kw))
            || self
                .description_all
                .iter()
                .any(|group| group.iter().all(|kw| description_lower.contains(kw)))
    }
}

/// Evaluated top to bottom; the first match wins. Keyword sets overlap
/// ("memory" shows up in CPU cache blurbs), so the order is load-bearing.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        kind: ComponentKind::Cpu,
        name_keywords: &["processor", "cpu", "ryzen", "core i"],
        description_all: &[&["socket", "ghz"]],
    },
    ClassificationRule {
        kind: ComponentKind::Gpu,
        name_keywords: &["graphics card", "gpu", "geforce", "radeon", "rtx", "gtx"],
        description_all: &[],
    },
    ClassificationRule {
        kind: ComponentKind::Motherboard,
        name_keywords: &["motherboard", "mainboard"],
        description_all: &[&["socket", "form factor"]],
    },
    ClassificationRule {
        kind: ComponentKind::Ram,
        name_keywords: &["memory", "ram", "ddr"],
        description_all: &[&["mhz", "cl"]],
    },
    ClassificationRule {
        kind: ComponentKind::Storage,
        name_keywords: &["ssd", "hdd", "solid state", "hard drive", "nvme"],
        description_all: &[],
    },
];

pub const KNOWN_MANUFACTURERS: &[&str] = &[
    "Intel",
    "AMD",
    "NVIDIA",
    "ASUS",
    "MSI",
    "Gigabyte",
    "Corsair",
    "Kingston",
    "Western Digital",
    "Samsung",
    "Seagate",
    "EVGA",
    "G.Skill",
    "Crucial",
    "ASRock",
    "PNY",
    "Zotac",
    "Sapphire",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: &'static str,
    pub kind: ComponentKind,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN,
            kind: ComponentKind::Generic,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == ComponentKind::Generic
    }
}

pub fn classify(name: &str, description: &str) -> Classification {
    classify_with(CLASSIFICATION_RULES, name, description)
}

/// Classify against an explicit rule table.
pub fn classify_with(rules: &[ClassificationRule], name: &str, description: &str) -> Classification {
    let name_lower = name.to_lowercase();
    let description_lower = description.to_lowercase();

    rules
        .iter()
        .find(|rule| rule.matches(&name_lower, &description_lower))
        .map(|rule| Classification {
            category: rule.kind.category_name(),
            kind: rule.kind,
        })
        .unwrap_or_else(Classification::unknown)
}

/// First entry of `known` found in the name or, failing that for the same
/// entry, in the description. Case-insensitive. `"Unknown"` when nothing
/// matches.
pub fn resolve_manufacturer(name: &str, description: &str, known: &[&str]) -> String {
    let name_lower = name.to_lowercase();
    let description_lower = description.to_lowercase();

    known
        .iter()
        .find(|manufacturer| {
            let needle = manufacturer.to_lowercase();
            name_lower.contains(&needle)
                || (!description_lower.trim().is_empty() && description_lower.contains(&needle))
        })
        .map(|manufacturer| manufacturer.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
