use chrono::Utc;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ScraperConfig;
use crate::fetcher::{DocumentFetcher, parse_document};
use crate::models::{
    ActiveRun, EntityId, ManufacturerLookup, NewManufacturer, ScrapeRunLog, ScrapingSource, UNKNOWN,
};
use crate::selectors::SelectorConfig;
use crate::store::ScrapeRepository;
use crate::strategy::{ExtractionContext, StrategyRegistry};
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Bound on one whole fetch, retries included.
    pub fetch_deadline: Duration,
    pub max_concurrent_runs: usize,
}

impl From<&ScraperConfig> for OrchestratorSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            fetch_deadline: config.fetch_deadline(),
            max_concurrent_runs: config.max_concurrent_runs.max(1),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&ScraperConfig::default())
    }
}

/// Drives one scrape run per source, from lookup loading through to the
/// persisted run log.
#[derive(Clone)]
pub struct ScrapeOrchestrator {
    repository: Arc<dyn ScrapeRepository>,
    fetcher: Arc<dyn DocumentFetcher>,
    strategies: Arc<StrategyRegistry>,
    settings: OrchestratorSettings,
}

impl ScrapeOrchestrator {
    pub fn new(
        repository: Arc<dyn ScrapeRepository>,
        fetcher: Arc<dyn DocumentFetcher>,
        strategies: StrategyRegistry,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            repository,
            fetcher,
            strategies: Arc::new(strategies),
            settings,
        }
    }

    pub async fn scrape_source(&self, source_id: EntityId) -> Result<ScrapeRunLog> {
        self.scrape_source_with_cancel(source_id, CancellationToken::new()).await
    }

    /// Run one source to completion.
    ///
    /// A missing or disabled source is rejected before a run starts. After
    /// that a finalized log is always persisted. Configuration and fetch
    /// failures come back as `Ok` with an unsuccessful log; persistence
    /// failures are recorded in the log and then returned as `Err`.
    #[instrument(skip(self, cancel))]
    pub async fn scrape_source_with_cancel(
        &self,
        source_id: EntityId,
        cancel: CancellationToken,
    ) -> Result<ScrapeRunLog> {
        let source = self.resolve_source(source_id).await?;

        let run = ActiveRun::begin(source.id);
        counter!("scrape_runs_total").increment(1);
        info!(
            "Starting run {} for source {} ('{}')",
            run.run_id(),
            run.source_id(),
            source.name
        );

        let (log, fatal) = match self.execute(&source, &cancel).await {
            Ok(count) => (run.finish(Ok(count)), None),
            Err(e) => {
                warn!("Run for source '{}' failed: {}", source.name, e);
                let log = run.finish(Err(&e));
                let fatal = e.is_persistence().then_some(e);
                (log, fatal)
            }
        };

        if !log.is_successful {
            counter!("scrape_runs_failed_total").increment(1);
        }

        if let Err(e) = self.repository.persist_run_log(&log).await {
            error!("Failed to persist run log {}: {}", log.run_id, e);
            return Err(fatal.unwrap_or(e));
        }

        match fatal {
            Some(e) => Err(e),
            None => {
                info!(
                    "Run {} finished: successful={}, items={}",
                    log.run_id, log.is_successful, log.items_scraped
                );
                Ok(log)
            }
        }
    }

    /// Run several sources concurrently, at most `max_concurrent_runs` at a
    /// time. Results come back in input order. Cancelling `cancel` stops
    /// every run still fetching.
    pub async fn scrape_sources(
        &self,
        source_ids: &[EntityId],
        cancel: CancellationToken,
    ) -> Vec<(EntityId, Result<ScrapeRunLog>)> {
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_runs));
        let mut tasks = JoinSet::new();

        for (index, &source_id) in source_ids.iter().enumerate() {
            let this = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let run_cancel = cancel.child_token();

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => this.scrape_source_with_cancel(source_id, run_cancel).await,
                    Err(_) => Err(AppError::Internal("run semaphore closed".into())),
                };
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<ScrapeRunLog>>> = source_ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => error!("Scrape task panicked: {}", e),
            }
        }

        source_ids
            .iter()
            .zip(results)
            .map(|(&id, result)| {
                let result =
                    result.unwrap_or_else(|| Err(AppError::Internal(format!("run for source {} did not complete", id))));
                (id, result)
            })
            .collect()
    }

    async fn resolve_source(&self, source_id: EntityId) -> Result<ScrapingSource> {
        match self.repository.get_source(source_id).await? {
            Some(source) if source.is_enabled => Ok(source),
            Some(source) => Err(AppError::configuration(format!(
                "source '{}' ({}) is disabled",
                source.name, source_id
            ))),
            None => Err(AppError::configuration(format!("source {} not found", source_id))),
        }
    }

    async fn execute(&self, source: &ScrapingSource, cancel: &CancellationToken) -> Result<usize> {
        let categories = self.repository.load_categories().await?;
        let manufacturers = self.load_manufacturers().await?;
        if categories.is_empty() {
            warn!("No categories loaded; every product on '{}' will be skipped", source.name);
        }
        debug!(
            "Loaded {} categories and {} manufacturers",
            categories.len(),
            manufacturers.len()
        );

        let selectors = SelectorConfig::from_blob(source.scrape_configuration.as_deref())?.compile()?;
        let html = self.fetch(&source.base_url, cancel).await?;
        let strategy = self.strategies.dispatch(&source.name);

        // Html is not Send; it must be gone before the next await.
        let outcome = {
            let document = parse_document(&html);
            let ctx = ExtractionContext {
                document: &document,
                page_url: &source.base_url,
                selectors: &selectors,
                categories: &categories,
                manufacturers: &manufacturers,
                scraped_at: Utc::now(),
            };
            strategy.extract(&ctx)
        };

        info!(
            "'{}' extracted {} of {} product nodes ({} skipped, {} failed)",
            source.name,
            outcome.components.len(),
            outcome.nodes_seen,
            outcome.skipped,
            outcome.failed
        );
        counter!("product_nodes_skipped_total").increment((outcome.skipped + outcome.failed) as u64);

        if outcome.components.is_empty() {
            return Ok(0);
        }

        let persisted = self.repository.persist_components(&outcome.components).await?;
        counter!("components_extracted_total").increment(persisted as u64);
        Ok(persisted)
    }

    /// Manufacturer snapshot for one run, creating "Unknown" if the store
    /// has none yet.
    async fn load_manufacturers(&self) -> Result<ManufacturerLookup> {
        let mut by_name: HashMap<String, EntityId> = self.repository.load_manufacturers().await?;

        if !by_name.contains_key(UNKNOWN) {
            let id = self.repository.create_manufacturer(NewManufacturer::unknown()).await?;
            info!("Created '{}' manufacturer with id {}", UNKNOWN, id);
            by_name.insert(UNKNOWN.to_string(), id);
        }

        ManufacturerLookup::with_unknown(by_name)
            .ok_or_else(|| AppError::Internal(format!("'{}' manufacturer missing after creation", UNKNOWN)))
    }

    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        let deadline = self.settings.fetch_deadline;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = tokio::time::timeout(deadline, self.fetcher.fetch_document(url)) => match result {
                Ok(body) => body,
                Err(_) => Err(AppError::Timeout {
                    url: url.to_string(),
                    elapsed: deadline,
                }),
            },
        }
    }
}
