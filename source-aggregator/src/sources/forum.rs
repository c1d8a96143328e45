use crate::fanout::{merge_capped, settle_all};
use crate::traits::{FeedSource, Upstream};
use crate::types::{AggregatorError, FeedPayload, ForumPost, Result, SourceKey, SourcesConfig};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Hot posts from a fixed list of channels, fetched concurrently.
pub struct ForumSource {
    base_url: String,
    channels: Vec<String>,
    per_channel_limit: usize,
    cap: usize,
    ttl: Duration,
}

impl ForumSource {
    pub fn new(config: &SourcesConfig, default_ttl: Duration) -> Self {
        Self {
            base_url: config.endpoints.reddit.trim_end_matches('/').to_string(),
            channels: config.forum_channels.clone(),
            per_channel_limit: config.per_channel_limit,
            cap: config.result_cap,
            ttl: config.ttl_for(SourceKey::Reddit, default_ttl),
        }
    }

    async fn fetch_channel(&self, upstream: &dyn Upstream, channel: &str) -> Result<Vec<ForumPost>> {
        let url = format!("{}/r/{}/hot.json", self.base_url, channel);
        let listing = upstream
            .get_json(&url, &[("limit", self.per_channel_limit.to_string())])
            .await?;
        parse_listing(&listing, channel)
    }
}

/// Posts of one listing response, each tagged with `channel`. Children that do
/// not decode are dropped.
fn parse_listing(listing: &Value, channel: &str) -> Result<Vec<ForumPost>> {
    let children = listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| AggregatorError::General(format!("listing for {} has no children", channel)))?;

    let posts = children
        .iter()
        .filter_map(|child| child.get("data"))
        .filter_map(|data| match serde_json::from_value::<ForumPost>(data.clone()) {
            Ok(mut post) => {
                post.subreddit_name = channel.to_string();
                Some(post)
            }
            Err(e) => {
                debug!(channel, error = %e, "Dropping malformed post");
                None
            }
        })
        .collect();

    Ok(posts)
}

#[async_trait]
impl FeedSource for ForumSource {
    type Record = ForumPost;

    fn key(&self) -> SourceKey {
        SourceKey::Reddit
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn collect(&self, upstream: &dyn Upstream) -> Result<Vec<ForumPost>> {
        let branches = self
            .channels
            .iter()
            .map(|channel| (channel.as_str(), self.fetch_channel(upstream, channel)))
            .collect();
        let parts = settle_all(SourceKey::Reddit, branches).await;

        Ok(merge_capped(parts, self.cap))
    }

    fn into_payload(records: Vec<ForumPost>) -> FeedPayload {
        FeedPayload::Posts(records)
    }

    fn from_payload(payload: FeedPayload) -> Option<Vec<ForumPost>> {
        match payload {
            FeedPayload::Posts(posts) => Some(posts),
            _ => None,
        }
    }
}
