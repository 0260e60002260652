use crate::parser::FeedParser;
use crate::types::{FetchConfig, InsightError, Paper, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Client for the arXiv query API.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    rate_limiter: Arc<Mutex<HashMap<String, Instant>>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Builds the query URL for a category. The category is passed through as given.
    pub fn query_url(&self, category: &str) -> Result<Url> {
        let max_results = self.config.max_results.to_string();
        let url = Url::parse_with_params(
            &self.config.feed_url,
            &[
                ("search_query", format!("cat:{}", category).as_str()),
                ("sortBy", "lastUpdatedDate"),
                ("max_results", max_results.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Fetches the most recently updated papers of a category, in upstream order.
    pub async fn fetch_category(&self, category: &str) -> Result<Vec<Paper>> {
        let url = self.query_url(category)?;
        debug!("Fetching category {} from {}", category, url);

        self.apply_rate_limit(&url).await;

        let start_time = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(InsightError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content = response.text().await?;
        info!(
            "Fetched feed for {} ({} bytes in {}ms)",
            category,
            content.len(),
            start_time.elapsed().as_millis()
        );

        FeedParser::parse_papers(&content, self.config.max_results)
    }

    async fn apply_rate_limit(&self, url: &Url) {
        if self.config.min_request_interval_ms == 0 {
            return;
        }

        let host = url.host_str().unwrap_or("").to_string();
        let min_interval = Duration::from_millis(self.config.min_request_interval_ms);

        // Held across the sleep so concurrent callers queue up behind each other.
        let mut rate_limiter = self.rate_limiter.lock().await;

        if let Some(last_request) = rate_limiter.get(&host) {
            let elapsed = last_request.elapsed();
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                debug!("Rate limiting {}: waiting {:?}", host, wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        rate_limiter.insert(host, Instant::now());
    }
}
