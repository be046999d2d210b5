use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use hardware_scraper::{
    AppConfig, HttpFetcher, MemoryRepository, OrchestratorSettings, ScrapeOrchestrator,
    ScrapeRepository, StrategyRegistry, classify,
    models::EntityId,
    telemetry::{init_metrics, init_tracing},
};

#[derive(Parser, Debug)]
#[command(name = "hardware-scraper", version, about = "Scrape PC hardware listings into typed components")]
struct Cli {
    /// Config file to load instead of the config/ directory layering
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a single source
    Scrape {
        #[arg(short, long)]
        source: EntityId,
    },
    /// Scrape every enabled source concurrently
    ScrapeAll,
    /// List configured sources
    Sources,
    /// Classify a product name without fetching anything
    Classify {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::from_env().context("failed to load configuration")?,
    };

    let _log_guard = init_tracing(&config.logging);
    init_metrics(&config.metrics);

    info!("Starting hardware-scraper...");

    match cli.command {
        Command::Classify { name, description } => {
            let classification = classify(&name, &description);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Command::Sources => {
            let repository = MemoryRepository::from_config(&config).await;
            let sources = repository.list_sources().await?;
            println!("{}", serde_json::to_string_pretty(&sources)?);
        }
        Command::Scrape { source } => {
            let (orchestrator, _) = build_orchestrator(&config).await?;
            let cancel = CancellationToken::new();
            spawn_ctrl_c(cancel.clone());

            let log = orchestrator.scrape_source_with_cancel(source, cancel).await?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        Command::ScrapeAll => {
            let (orchestrator, repository) = build_orchestrator(&config).await?;
            let ids: Vec<EntityId> = repository
                .list_sources()
                .await?
                .into_iter()
                .filter(|s| s.is_enabled)
                .map(|s| s.id)
                .collect();

            let cancel = CancellationToken::new();
            spawn_ctrl_c(cancel.clone());

            let mut logs = Vec::new();
            for (id, result) in orchestrator.scrape_sources(&ids, cancel).await {
                match result {
                    Ok(log) => logs.push(log),
                    Err(e) => warn!("Source {} failed: {}", id, e),
                }
            }
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
    }

    Ok(())
}

async fn build_orchestrator(config: &AppConfig) -> Result<(ScrapeOrchestrator, Arc<MemoryRepository>)> {
    let repository = Arc::new(MemoryRepository::from_config(config).await);
    let fetcher = Arc::new(HttpFetcher::new(&config.scraper)?);

    let orchestrator = ScrapeOrchestrator::new(
        repository.clone(),
        fetcher,
        StrategyRegistry::with_defaults(),
        OrchestratorSettings::from(&config.scraper),
    );

    Ok((orchestrator, repository))
}

fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            cancel.cancel();
        }
    });
}
