// Integration tests for hardware-scraper
// These run the orchestrator end to end against a local HTTP server

pub mod concurrency_tests;
pub mod run_tests;

use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hardware_scraper::{
    HttpFetcher, MemoryRepository, OrchestratorSettings, ScrapeOrchestrator, ScrapingSource, StrategyRegistry,
    config::ScraperConfig,
};

pub const LISTING_CONFIG: &str = r#"{
    "productListSelector": "div.product",
    "nameSelector": "h3.name",
    "priceSelector": "span.price",
    "imageSelector": "img",
    "descriptionSelector": "p.desc",
    "inStockSelector": ".stock"
}"#;

/// Test scraper configuration: short timeouts, one quick retry.
pub fn get_test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        max_concurrent_runs: 2,
        retry_attempts: 1,
        retry_delay_ms: 1,
        request_timeout: 30,
        user_agent: "HardwareScraper-Test/1.0".to_string(),
    }
}

/// Repository with the five categories and a few manufacturers, but no
/// "Unknown" entry.
pub async fn create_test_repository() -> Arc<MemoryRepository> {
    let repo = MemoryRepository::new();
    for category in ["CPU", "GPU", "Motherboard", "RAM", "Storage"] {
        repo.add_category(category).await;
    }
    for manufacturer in ["Intel", "AMD", "NVIDIA", "Corsair", "Samsung"] {
        repo.add_manufacturer(manufacturer).await;
    }
    Arc::new(repo)
}

pub fn create_test_orchestrator(repo: Arc<MemoryRepository>) -> ScrapeOrchestrator {
    let config = get_test_scraper_config();
    ScrapeOrchestrator::new(
        repo,
        Arc::new(HttpFetcher::new(&config).expect("http client")),
        StrategyRegistry::with_defaults(),
        OrchestratorSettings::from(&config),
    )
}

pub fn listing_source(id: i64, name: &str, url: String) -> ScrapingSource {
    ScrapingSource::new(id, name, url).with_configuration(LISTING_CONFIG)
}

/// One product card in the listing markup.
pub fn product_card(name: &str, price: &str, image: &str, description: &str) -> String {
    format!(
        r#"<div class="product"><h3 class="name">{}</h3><span class="price">{}</span><img src="{}"><p class="desc">{}</p></div>"#,
        name, price, image, description
    )
}

pub fn listing_page(cards: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", cards.concat())
}

pub async fn serve_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
