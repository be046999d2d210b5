// Integration tests for hardware-scraper
//
// These drive full scrape runs through the public API: a local HTTP
// server stands in for the marketplace and the in-memory repository
// records what was persisted.

mod integration;

use hardware_scraper::{
    AppConfig, ExtractionStrategy, MemoryRepository, ScrapeRepository, StrategyRegistry, classify,
};

#[tokio::test]
async fn test_system_health() -> anyhow::Result<()> {
    let config = AppConfig::default();
    config.validate()?;

    let repo = MemoryRepository::from_config(&config).await;
    assert_eq!(repo.load_categories().await?.len(), 5);
    assert!(repo.list_sources().await?.is_empty());

    let registry = StrategyRegistry::with_defaults();
    assert_eq!(registry.dispatch("anything").name(), "default");
    Ok(())
}

#[test]
fn test_classify_through_public_api() {
    assert_eq!(classify("AMD Ryzen 9 7950X3D", "").category, "CPU");
    assert_eq!(classify("Mystery box", "").category, "Unknown");
}
