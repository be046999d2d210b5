use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, MetricsConfig};

pub const LOG_FILE_PREFIX: &str = "hardware-scraper.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hardware_scraper=debug"))
}

/// Console logging, plus a daily rolling file when `logging.directory` is
/// set. Keep the returned guard alive for the life of the process or the
/// file writer stops flushing.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let registry = Registry::default().with(env_filter());
    let console_layer = fmt::Layer::new().with_writer(std::io::stderr).with_target(true);

    match config.directory.as_deref() {
        Some(dir) => {
            let (file_writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            let file_layer = fmt::Layer::new()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false);
            registry.with(console_layer).with(file_layer).init();
            Some(guard)
        }
        None => {
            registry.with(console_layer).init();
            None
        }
    }
}

/// Install the Prometheus recorder and its HTTP listener. Failure to bind
/// is logged and otherwise ignored.
pub fn init_metrics(config: &MetricsConfig) {
    if !config.enabled {
        return;
    }

    let addr = config.listen_addr();
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => info!("Metrics exporter listening on {}", addr),
        Err(e) => warn!("Failed to install Prometheus recorder on {}: {}", addr, e),
    }
}
