use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

/// Retrieves the raw HTML for a page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with a fixed user agent and retry on transient
/// failures.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(config.request_timeout.min(10)))
            .build()?;

        Ok(Self {
            client,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms.max(1),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AppError::Fetch {
                url: url.to_string(),
                status: Some(status),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes, {})", url, body.len(), status);
        Ok(body)
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        // delay, 2×delay, 4×delay, ...
        let strategy = ExponentialBackoff::from_millis(2)
            .factor((self.retry_delay_ms / 2).max(1))
            .map(jitter)
            .take(self.retry_attempts as usize);

        RetryIf::spawn(
            strategy,
            || self.fetch_once(url),
            |e: &AppError| {
                // 4xx responses won't get better on a retry
                let retry = e.is_retryable();
                if retry {
                    warn!("Retrying fetch of {}: {}", url, e);
                }
                retry
            },
        )
        .await
    }
}

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> ScraperConfig {
        ScraperConfig {
            max_concurrent_runs: 1,
            retry_attempts: 2,
            retry_delay_ms: 1,
            request_timeout: 5,
            user_agent: "HardwareScraper-Test/1.0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_document_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/deals"))
            .and(header("user-agent", "HardwareScraper-Test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>ok</body></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let body = fetcher
            .fetch_document(&format!("{}/deals", server.uri()))
            .await
            .unwrap();
        assert!(body.contains("ok"));
    }

    #[tokio::test]
    async fn test_fetch_document_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher.fetch_document(&server.uri()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Fetch { status: Some(s), ref message, .. }
                if s == reqwest::StatusCode::SERVICE_UNAVAILABLE && message == "HTTP 503 Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn test_fetch_document_does_not_retry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher.fetch_document(&server.uri()).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        assert!(matches!(err, AppError::Fetch { status: Some(s), .. } if s == reqwest::StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_parse_document() {
        let doc = parse_document("<html><body><p class=\"x\">hi</p></body></html>");
        let sel = scraper::Selector::parse("p.x").unwrap();
        assert_eq!(doc.select(&sel).count(), 1);
    }
}
