use crate::fanout::{merge_filtered, settle_all};
use crate::traits::{FeedSource, Upstream};
use crate::types::{AggregatorError, FeedPayload, Result, SourceKey, SourcesConfig, Story};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Top stories: one index fetch, then one detail fetch per story id.
pub struct NewsSource {
    base_url: String,
    id_limit: usize,
    cap: usize,
    ttl: Duration,
}

impl NewsSource {
    pub fn new(config: &SourcesConfig, default_ttl: Duration) -> Self {
        Self {
            base_url: config.endpoints.hacker_news.trim_end_matches('/').to_string(),
            id_limit: config.story_id_limit,
            cap: config.result_cap,
            ttl: config.ttl_for(SourceKey::News, default_ttl),
        }
    }

    async fn fetch_story(&self, upstream: &dyn Upstream, id: u64) -> Result<Vec<Story>> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let value = upstream.get_json(&url, &[]).await?;
        // deleted items come back as a literal null
        if value.is_null() {
            return Ok(Vec::new());
        }
        let story: Story = serde_json::from_value(value)?;
        Ok(vec![story])
    }
}

#[async_trait]
impl FeedSource for NewsSource {
    type Record = Story;

    fn key(&self) -> SourceKey {
        SourceKey::News
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn collect(&self, upstream: &dyn Upstream) -> Result<Vec<Story>> {
        let index_url = format!("{}/topstories.json", self.base_url);
        let index = upstream
            .get_json(&index_url, &[])
            .await
            .map_err(|e| AggregatorError::upstream(SourceKey::News, e))?;
        let mut ids: Vec<u64> =
            serde_json::from_value(index).map_err(|e| AggregatorError::upstream(SourceKey::News, e))?;
        ids.truncate(self.id_limit);

        info!("Fetching {} story details", ids.len());

        let branches = ids
            .into_iter()
            .map(|id| (id, self.fetch_story(upstream, id)))
            .collect();
        let parts = settle_all(SourceKey::News, branches).await;

        Ok(merge_filtered(parts, self.cap, Story::has_title))
    }

    fn into_payload(records: Vec<Story>) -> FeedPayload {
        FeedPayload::Stories(records)
    }

    fn from_payload(payload: FeedPayload) -> Option<Vec<Story>> {
        match payload {
            FeedPayload::Stories(stories) => Some(stories),
            _ => None,
        }
    }
}
