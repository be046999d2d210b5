pub mod classifier;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod orchestrator;
pub mod selectors;
pub mod store;
pub mod strategy;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use classifier::{Classification, classify};
pub use config::AppConfig;
pub use fetcher::{DocumentFetcher, HttpFetcher};
pub use models::{Component, ComponentKind, ScrapeRunLog, ScrapingSource};
pub use orchestrator::{OrchestratorSettings, ScrapeOrchestrator};
pub use selectors::{CompiledSelectors, SelectorConfig};
pub use store::{MemoryRepository, ScrapeRepository};
pub use strategy::{DefaultStrategy, ExtractionContext, ExtractionStrategy, StrategyRegistry};
pub use utils::error::{AppError, Result};
