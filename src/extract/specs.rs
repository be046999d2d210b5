//! Variant attribute derivation from free-text product descriptions.
//!
//! Every field follows the parse-or-default contract of
//! [`crate::extract::fields`]: a pattern that does not match leaves the
//! field at its default and never aborts the component.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::extract::fields::{capture_text, parse_decimal, parse_int};
use crate::models::{
    ComponentKind, ComponentSpecs, CpuSpecs, GpuSpecs, MotherboardSpecs, RamSpecs, StorageSpecs,
};

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

// ── CPU ──────────────────────────────────────────────────────────────────────

static CPU_CORES: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*cores?"));
static CPU_THREADS: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*threads?"));
static CPU_BASE_CLOCK: Lazy<Regex> = Lazy::new(|| ci(r"(\d+(?:\.\d+)?)\s*GHz"));
static CPU_BOOST_CLOCK: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:boost|turbo|max).*?(\d+(?:\.\d+)?)\s*GHz"));
static SOCKET: Lazy<Regex> = Lazy::new(|| ci(r"Socket\s*([A-Z0-9\-]+)"));
static CPU_TDP: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*W\s*TDP"));
static CPU_ARCHITECTURE: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:Architecture|Micro[-\s]?architecture):\s*([A-Za-z0-9\s]+)"));
static CPU_CACHE: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*MB\s*(?:L3|Cache)"));

pub fn derive_cpu(description: &str) -> CpuSpecs {
    let core_count = parse_int(description, &CPU_CORES, 0).value;
    let base_clock = parse_decimal(description, &CPU_BASE_CLOCK, Decimal::ZERO).value;
    let cache = parse_int(description, &CPU_CACHE, 0);

    CpuSpecs {
        core_count,
        thread_count: parse_int(description, &CPU_THREADS, core_count).value,
        base_clock,
        boost_clock: parse_decimal(description, &CPU_BOOST_CLOCK, base_clock).value,
        socket: capture_text(description, &SOCKET),
        tdp: parse_int(description, &CPU_TDP, 0).value,
        architecture: capture_text(description, &CPU_ARCHITECTURE),
        cache_size: (!cache.is_default()).then_some(cache.value),
    }
}

// ── GPU ──────────────────────────────────────────────────────────────────────

static GPU_MEMORY_SIZE: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*GB"));
static GPU_MEMORY_TYPE: Lazy<Regex> = Lazy::new(|| ci(r"(GDDR\d+X?)"));
static GPU_CORE_CLOCK: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:core|base).*?(\d+(?:\.\d+)?)\s*(?:MHz|GHz)"));
static GPU_BOOST_CLOCK: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:boost|game).*?(\d+(?:\.\d+)?)\s*(?:MHz|GHz)"));
static GPU_STREAM_PROCESSORS: Lazy<Regex> =
    Lazy::new(|| ci(r"(\d+)\s*(?:Stream Processors|CUDA Cores)"));
static GPU_INTERFACE: Lazy<Regex> =
    Lazy::new(|| ci(r"PCI(?:e|Express)\s*(\d+(?:\.\d+)?)\s*x(\d+)"));
static GPU_TDP: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*W"));
static GPU_ARCHITECTURE: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:Architecture|Arch):\s*([A-Za-z0-9\s]+)"));
static GPU_PORTS: Lazy<Regex> =
    Lazy::new(|| ci(r"(?:Ports?|Outputs?|Displays?):\s*([A-Za-z0-9\s,]+)"));

/// Clock values above 100 are taken to be MHz and scaled to GHz.
pub fn normalize_clock_ghz(clock: Decimal) -> Decimal {
    if clock > Decimal::ONE_HUNDRED {
        clock / Decimal::ONE_THOUSAND
    } else {
        clock
    }
}

pub fn derive_gpu(description: &str) -> GpuSpecs {
    let core_clock = parse_decimal(description, &GPU_CORE_CLOCK, Decimal::ZERO).value;
    let boost_clock = parse_decimal(description, &GPU_BOOST_CLOCK, core_clock).value;
    let stream_processors = parse_int(description, &GPU_STREAM_PROCESSORS, 0);

    let interface = GPU_INTERFACE
        .captures(description)
        .map(|caps| format!("PCIe {} x{}", &caps[1], &caps[2]));

    GpuSpecs {
        memory_size: parse_int(description, &GPU_MEMORY_SIZE, 0).value,
        memory_type: capture_text(description, &GPU_MEMORY_TYPE),
        core_clock: normalize_clock_ghz(core_clock),
        boost_clock: normalize_clock_ghz(boost_clock),
        stream_processors: (!stream_processors.is_default()).then_some(stream_processors.value),
        interface,
        tdp: parse_int(description, &GPU_TDP, 0).value,
        architecture: capture_text(description, &GPU_ARCHITECTURE),
        ports: capture_text(description, &GPU_PORTS),
    }
}

// ── RAM ──────────────────────────────────────────────────────────────────────

static RAM_CAPACITY: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*GB"));
static DDR_TYPE: Lazy<Regex> = Lazy::new(|| ci(r"(DDR\d)"));
static RAM_SPEED: Lazy<Regex> = Lazy::new(|| ci(r"(\d{3,5})\s*(?:MHz|MT/s)"));
static RAM_CAS: Lazy<Regex> = Lazy::new(|| ci(r"\bCL\s*(\d+)"));
static RAM_MODULES: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*x\s*\d+\s*GB"));

pub fn derive_ram(description: &str) -> RamSpecs {
    RamSpecs {
        capacity: parse_int(description, &RAM_CAPACITY, 0).value,
        memory_type: capture_text(description, &DDR_TYPE).map(|t| t.to_uppercase()),
        speed: parse_int(description, &RAM_SPEED, 0).value,
        cas_latency: parse_int(description, &RAM_CAS, 0).value,
        module_count: parse_int(description, &RAM_MODULES, 1).value,
        has_rgb: description.to_lowercase().contains("rgb"),
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

static STORAGE_CAPACITY: Lazy<Regex> = Lazy::new(|| ci(r"(\d+(?:\.\d+)?)\s*(TB|GB)\b"));
static STORAGE_FORM_FACTOR: Lazy<Regex> =
    Lazy::new(|| ci(r#"(M\.2|2\.5\s*(?:"|-?inch)|3\.5\s*(?:"|-?inch))"#));
static STORAGE_INTERFACE: Lazy<Regex> =
    Lazy::new(|| ci(r"(PCIe\s*(?:Gen\s*)?\d+(?:\.\d+)?|SATA(?:\s*III)?)"));
static STORAGE_READ: Lazy<Regex> =
    Lazy::new(|| ci(r"read(?:\s*speeds?)?[^0-9]{0,20}(\d{2,5})\s*MB/s"));
static STORAGE_WRITE: Lazy<Regex> =
    Lazy::new(|| ci(r"write(?:\s*speeds?)?[^0-9]{0,20}(\d{2,5})\s*MB/s"));

/// Capacity in GB; terabytes are scaled by 1000.
fn storage_capacity_gb(description: &str) -> i32 {
    let amount = parse_decimal(description, &STORAGE_CAPACITY, Decimal::ZERO).value;
    let terabytes = STORAGE_CAPACITY
        .captures(description)
        .is_some_and(|caps| caps[2].eq_ignore_ascii_case("TB"));
    let gb = if terabytes {
        amount.checked_mul(Decimal::ONE_THOUSAND).unwrap_or(Decimal::ZERO)
    } else {
        amount
    };
    gb.round().to_i32().unwrap_or(0)
}

fn storage_type(description: &str) -> Option<String> {
    let lower = description.to_lowercase();
    let kind = if lower.contains("nvme") {
        "NVMe"
    } else if lower.contains("ssd") || lower.contains("solid state") {
        "SSD"
    } else if lower.contains("hdd") || lower.contains("hard drive") {
        "HDD"
    } else {
        return None;
    };
    Some(kind.to_string())
}

pub fn derive_storage(description: &str) -> StorageSpecs {
    let read = parse_int(description, &STORAGE_READ, 0);
    let write = parse_int(description, &STORAGE_WRITE, 0);

    StorageSpecs {
        capacity: storage_capacity_gb(description),
        storage_type: storage_type(description),
        form_factor: capture_text(description, &STORAGE_FORM_FACTOR),
        interface: capture_text(description, &STORAGE_INTERFACE),
        read_speed: (!read.is_default()).then_some(read.value),
        write_speed: (!write.is_default()).then_some(write.value),
    }
}

// ── Motherboard ──────────────────────────────────────────────────────────────

static BOARD_FORM_FACTOR: Lazy<Regex> =
    Lazy::new(|| ci(r"\b(E-ATX|Micro[-\s]?ATX|mATX|Mini[-\s]?ITX|ATX)\b"));
static BOARD_SOCKET_NAME: Lazy<Regex> = Lazy::new(|| ci(r"\b(LGA\s?\d{4}|AM\d)\b"));
static BOARD_CHIPSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([ABHXZ]\d{3}E?)\b").unwrap());
static BOARD_SLOTS: Lazy<Regex> = Lazy::new(|| ci(r"(\d+)\s*x?\s*(?:DIMM|memory slots?)"));
static BOARD_MAX_MEMORY: Lazy<Regex> = Lazy::new(|| ci(r"(?:up to|max(?:imum)?)\s*(\d+)\s*GB"));

pub fn derive_motherboard(description: &str) -> MotherboardSpecs {
    MotherboardSpecs {
        form_factor: capture_text(description, &BOARD_FORM_FACTOR),
        socket: capture_text(description, &SOCKET)
            .or_else(|| capture_text(description, &BOARD_SOCKET_NAME)),
        chipset: capture_text(description, &BOARD_CHIPSET),
        memory_slots: parse_int(description, &BOARD_SLOTS, 0).value,
        memory_type: capture_text(description, &DDR_TYPE).map(|t| t.to_uppercase()),
        max_memory: parse_int(description, &BOARD_MAX_MEMORY, 0).value,
    }
}

/// Build the variant payload for `kind` from free text.
pub fn derive_specs(kind: ComponentKind, text: &str) -> ComponentSpecs {
    match kind {
        ComponentKind::Cpu => ComponentSpecs::Cpu(derive_cpu(text)),
        ComponentKind::Gpu => ComponentSpecs::Gpu(derive_gpu(text)),
        ComponentKind::Motherboard => ComponentSpecs::Motherboard(derive_motherboard(text)),
        ComponentKind::Ram => ComponentSpecs::Ram(derive_ram(text)),
        ComponentKind::Storage => ComponentSpecs::Storage(derive_storage(text)),
        ComponentKind::Generic => ComponentSpecs::Generic,
    }
}
