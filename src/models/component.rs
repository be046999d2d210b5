use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ComponentKind, EntityId};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Attributes shared by every scraped component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentBase {
    pub name: String,
    pub model: String,
    pub price: Decimal,
    pub currency: String,
    pub source_url: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub in_stock: bool,
    pub category_id: EntityId,
    pub manufacturer_id: EntityId,
    pub scraped_at: DateTime<Utc>,
    pub specifications: Vec<Specification>,
}

/// A free-form name/value row lifted from a product's spec table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CpuSpecs {
    pub core_count: i32,
    pub thread_count: i32,
    pub base_clock: Decimal,
    pub boost_clock: Decimal,
    pub socket: Option<String>,
    pub tdp: i32,
    pub architecture: Option<String>,
    pub cache_size: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GpuSpecs {
    pub memory_size: i32,
    pub memory_type: Option<String>,
    pub core_clock: Decimal,
    pub boost_clock: Decimal,
    pub stream_processors: Option<i32>,
    pub interface: Option<String>,
    pub tdp: i32,
    pub architecture: Option<String>,
    pub ports: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MotherboardSpecs {
    pub form_factor: Option<String>,
    pub socket: Option<String>,
    pub chipset: Option<String>,
    pub memory_slots: i32,
    pub memory_type: Option<String>,
    pub max_memory: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RamSpecs {
    pub capacity: i32,
    pub memory_type: Option<String>,
    pub speed: i32,
    pub cas_latency: i32,
    pub module_count: i32,
    pub has_rgb: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSpecs {
    pub capacity: i32,
    pub storage_type: Option<String>,
    pub form_factor: Option<String>,
    pub interface: Option<String>,
    pub read_speed: Option<i32>,
    pub write_speed: Option<i32>,
}

/// Variant payload. The variant doubles as the component's kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComponentSpecs {
    Cpu(CpuSpecs),
    Gpu(GpuSpecs),
    Motherboard(MotherboardSpecs),
    Ram(RamSpecs),
    Storage(StorageSpecs),
    Generic,
}

impl ComponentSpecs {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSpecs::Cpu(_) => ComponentKind::Cpu,
            ComponentSpecs::Gpu(_) => ComponentKind::Gpu,
            ComponentSpecs::Motherboard(_) => ComponentKind::Motherboard,
            ComponentSpecs::Ram(_) => ComponentKind::Ram,
            ComponentSpecs::Storage(_) => ComponentKind::Storage,
            ComponentSpecs::Generic => ComponentKind::Generic,
        }
    }
}

/// A typed hardware component.
///
/// The variant is chosen once in [`Component::new`] and cannot be swapped
/// afterwards; callers get read access to the payload only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    #[serde(flatten)]
    pub base: ComponentBase,
    specs: ComponentSpecs,
}

impl Component {
    pub fn new(base: ComponentBase, specs: ComponentSpecs) -> Self {
        Self { base, specs }
    }

    pub fn kind(&self) -> ComponentKind {
        self.specs.kind()
    }

    pub fn specs(&self) -> &ComponentSpecs {
        &self.specs
    }

    pub fn as_cpu(&self) -> Option<&CpuSpecs> {
        match &self.specs {
            ComponentSpecs::Cpu(specs) => Some(specs),
            _ => None,
        }
    }

    pub fn as_gpu(&self) -> Option<&GpuSpecs> {
        match &self.specs {
            ComponentSpecs::Gpu(specs) => Some(specs),
            _ => None,
        }
    }
}
