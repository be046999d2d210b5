use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::models::{CategoryLookup, Component, EntityId, NewManufacturer, ScrapeRunLog, ScrapingSource};
use crate::utils::error::{AppError, Result};

/// Storage collaborator of the orchestrator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScrapeRepository: Send + Sync {
    async fn get_source(&self, id: EntityId) -> Result<Option<ScrapingSource>>;

    async fn list_sources(&self) -> Result<Vec<ScrapingSource>>;

    async fn load_categories(&self) -> Result<CategoryLookup>;

    /// Raw name → id map. May lack the "Unknown" entry.
    async fn load_manufacturers(&self) -> Result<HashMap<String, EntityId>>;

    /// Returns the id of the manufacturer with this name, inserting it
    /// first if it does not exist yet.
    async fn create_manufacturer(&self, manufacturer: NewManufacturer) -> Result<EntityId>;

    async fn persist_components(&self, components: &[Component]) -> Result<usize>;

    async fn persist_run_log(&self, log: &ScrapeRunLog) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    sources: BTreeMap<EntityId, ScrapingSource>,
    categories: HashMap<String, EntityId>,
    manufacturers: HashMap<String, EntityId>,
    manufacturers_created: usize,
    components: Vec<Component>,
    run_logs: Vec<ScrapeRunLog>,
    next_id: EntityId,
}

impl MemoryState {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process repository. All writes go through one `RwLock`, which also
/// serialises manufacturer creation across concurrent runs.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed sources and lookups from the loaded configuration.
    pub async fn from_config(config: &AppConfig) -> Self {
        let repo = Self::new();
        for name in &config.lookups.categories {
            repo.add_category(name).await;
        }
        for name in &config.lookups.manufacturers {
            repo.add_manufacturer(name).await;
        }
        for source in &config.sources {
            repo.add_source(source.clone()).await;
        }
        info!(
            "Seeded repository with {} sources, {} categories, {} manufacturers",
            config.sources.len(),
            config.lookups.categories.len(),
            config.lookups.manufacturers.len()
        );
        repo
    }

    pub async fn add_source(&self, source: ScrapingSource) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(source.id);
        state.sources.insert(source.id, source);
    }

    pub async fn add_category(&self, name: &str) -> EntityId {
        let mut state = self.state.write().await;
        if let Some(id) = state.categories.get(name) {
            return *id;
        }
        let id = state.allocate_id();
        state.categories.insert(name.to_string(), id);
        id
    }

    /// Seeding helper; does not count as a creation.
    pub async fn add_manufacturer(&self, name: &str) -> EntityId {
        let mut state = self.state.write().await;
        if let Some(id) = state.manufacturers.get(name) {
            return *id;
        }
        let id = state.allocate_id();
        state.manufacturers.insert(name.to_string(), id);
        id
    }

    pub async fn components(&self) -> Vec<Component> {
        self.state.read().await.components.clone()
    }

    pub async fn run_logs(&self) -> Vec<ScrapeRunLog> {
        self.state.read().await.run_logs.clone()
    }

    pub async fn run_logs_for(&self, source_id: EntityId) -> Vec<ScrapeRunLog> {
        self.state
            .read()
            .await
            .run_logs
            .iter()
            .filter(|log| log.source_id == source_id)
            .cloned()
            .collect()
    }

    pub async fn manufacturer_id(&self, name: &str) -> Option<EntityId> {
        self.state.read().await.manufacturers.get(name).copied()
    }

    /// Number of manufacturers inserted through `create_manufacturer`.
    pub async fn manufacturers_created(&self) -> usize {
        self.state.read().await.manufacturers_created
    }
}

#[async_trait]
impl ScrapeRepository for MemoryRepository {
    async fn get_source(&self, id: EntityId) -> Result<Option<ScrapingSource>> {
        Ok(self.state.read().await.sources.get(&id).cloned())
    }

    async fn list_sources(&self) -> Result<Vec<ScrapingSource>> {
        Ok(self.state.read().await.sources.values().cloned().collect())
    }

    async fn load_categories(&self) -> Result<CategoryLookup> {
        Ok(CategoryLookup::new(self.state.read().await.categories.clone()))
    }

    async fn load_manufacturers(&self) -> Result<HashMap<String, EntityId>> {
        Ok(self.state.read().await.manufacturers.clone())
    }

    async fn create_manufacturer(&self, manufacturer: NewManufacturer) -> Result<EntityId> {
        if manufacturer.name.trim().is_empty() {
            return Err(AppError::Persistence("manufacturer name must not be empty".into()));
        }

        let mut state = self.state.write().await;
        if let Some(id) = state.manufacturers.get(&manufacturer.name) {
            return Ok(*id);
        }

        let id = state.allocate_id();
        state.manufacturers.insert(manufacturer.name.clone(), id);
        state.manufacturers_created += 1;
        debug!("Created manufacturer '{}' with id {}", manufacturer.name, id);
        Ok(id)
    }

    async fn persist_components(&self, components: &[Component]) -> Result<usize> {
        let mut state = self.state.write().await;
        state.components.extend_from_slice(components);
        Ok(components.len())
    }

    async fn persist_run_log(&self, log: &ScrapeRunLog) -> Result<()> {
        if !log.is_finalized() {
            return Err(AppError::Persistence(format!(
                "run log {} has no end time",
                log.run_id
            )));
        }
        self.state.write().await.run_logs.push(log.clone());
        Ok(())
    }
}
