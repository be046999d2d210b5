use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::classifier::KNOWN_MANUFACTURERS;
use crate::models::{ComponentKind, ScrapingSource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub sources: Vec<ScrapingSource>,
    #[serde(default)]
    pub lookups: LookupSeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub max_concurrent_runs: usize,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout: u64,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 4,
            retry_attempts: 2,
            retry_delay_ms: 500,
            request_timeout: 30,
            user_agent: format!("HardwareScraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScraperConfig {
    /// Per-request timeout handed to the HTTP client.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Upper bound on one whole fetch, retries and backoff included.
    pub fn fetch_deadline(&self) -> Duration {
        let attempts = u64::from(self.retry_attempts) + 1;
        let backoff_ms = self.retry_delay_ms.saturating_mul(1 << self.retry_attempts.min(10));
        Duration::from_secs(self.request_timeout.saturating_mul(attempts))
            .saturating_add(Duration::from_millis(backoff_ms))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily rolling log file. Console only when unset.
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// The exporter answers scrapes on any path at this port.
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9001,
        }
    }
}

impl MetricsConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Names the in-memory repository is seeded with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSeedConfig {
    pub categories: Vec<String>,
    pub manufacturers: Vec<String>,
}

impl Default for LookupSeedConfig {
    fn default() -> Self {
        Self {
            categories: [
                ComponentKind::Cpu,
                ComponentKind::Gpu,
                ComponentKind::Motherboard,
                ComponentKind::Ram,
                ComponentKind::Storage,
            ]
            .iter()
            .map(|kind| kind.category_name().to_string())
            .collect(),
            manufacturers: KNOWN_MANUFACTURERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("HWSCRAPER").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit file, still honouring `HWSCRAPER__*` overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let s = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("HWSCRAPER").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.max_concurrent_runs == 0 {
            return Err(ConfigError::Message("Scraper max_concurrent_runs must be greater than 0".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        if self.metrics.port == 0 {
            return Err(ConfigError::Message("Metrics port must be greater than 0".into()));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id) {
                return Err(ConfigError::Message(format!("Duplicate source id {}", source.id)));
            }
            if Url::parse(&source.base_url).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid base URL format for source '{}'",
                    source.name
                )));
            }
        }

        Ok(())
    }
}
