use crate::traits::Upstream;
use crate::types::{AggregatorError, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

const DEFAULT_ACCEPT: &str = "application/json, application/atom+xml;q=0.9, */*;q=0.8";

/// reqwest-backed [`Upstream`]. Timeouts come from the transport; each call is
/// a single attempt.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
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

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn send(&self, url: &str, query: &[(&str, String)], accept: &str) -> Result<Response> {
        let target = Url::parse_with_params(url, query)?;
        let start_time = Instant::now();

        let response = self
            .client
            .get(target.clone())
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        debug!(
            url = %target,
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(AggregatorError::Status {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Upstream for Fetcher {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        self.get_json_accepting(url, query, DEFAULT_ACCEPT).await
    }

    async fn get_json_accepting(&self, url: &str, query: &[(&str, String)], accept: &str) -> Result<Value> {
        let response = self.send(url, query, accept).await?;
        let value = response.json::<Value>().await?;
        Ok(value)
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self.send(url, query, DEFAULT_ACCEPT).await?;
        let content = response.text().await?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}
