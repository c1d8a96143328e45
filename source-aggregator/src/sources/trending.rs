use crate::traits::{FeedSource, Upstream};
use crate::types::{AggregatorError, FeedPayload, Repository, Result, SourceKey, SourcesConfig};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::time::Duration;
use tracing::debug;

/// Media type pinning the v3 search response shape.
pub const SEARCH_ACCEPT: &str = "application/vnd.github.v3+json";

/// Search query for repositories created after `today - window_days`.
pub fn trending_query(today: NaiveDate, window_days: i64) -> String {
    let since = today - chrono::Duration::days(window_days);
    format!("created:>{}", since.format("%Y-%m-%d"))
}

/// Most-starred recently created repositories. A single search call with no
/// partial-failure path: if it fails, the aggregation fails.
pub struct TrendingSource {
    search_url: String,
    window_days: i64,
    cap: usize,
    ttl: Duration,
}

impl TrendingSource {
    pub fn new(config: &SourcesConfig, default_ttl: Duration) -> Self {
        Self {
            search_url: config.endpoints.github_search.clone(),
            window_days: config.trending_window_days,
            cap: config.result_cap,
            ttl: config.ttl_for(SourceKey::Github, default_ttl),
        }
    }

    fn query(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        vec![
            ("q", trending_query(today, self.window_days)),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", self.cap.to_string()),
        ]
    }
}

#[async_trait]
impl FeedSource for TrendingSource {
    type Record = Repository;

    fn key(&self) -> SourceKey {
        SourceKey::Github
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn collect(&self, upstream: &dyn Upstream) -> Result<Vec<Repository>> {
        let query = self.query(Utc::now().date_naive());
        let response = upstream
            .get_json_accepting(&self.search_url, &query, SEARCH_ACCEPT)
            .await
            .map_err(|e| AggregatorError::upstream(SourceKey::Github, e))?;

        let items = response
            .get("items")
            .and_then(|items| items.as_array())
            .ok_or_else(|| AggregatorError::upstream(SourceKey::Github, "search response has no items array"))?;

        let repositories: Vec<Repository> = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<Repository>(item.clone()) {
                Ok(repo) => Some(repo),
                Err(e) => {
                    debug!(error = %e, "Dropping malformed repository item");
                    None
                }
            })
            .take(self.cap)
            .collect();

        Ok(repositories)
    }

    fn into_payload(records: Vec<Repository>) -> FeedPayload {
        FeedPayload::Repositories(records)
    }

    fn from_payload(payload: FeedPayload) -> Option<Vec<Repository>> {
        match payload {
            FeedPayload::Repositories(repositories) => Some(repositories),
            _ => None,
        }
    }
}
