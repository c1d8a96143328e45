use crate::types::{FeedPayload, Result, SourceKey};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Transport for upstream calls. One call is one attempt; there is no retry.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// GET `url` with `query` appended and decode the body as JSON.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value>;

    /// GET `url` with `query` appended and return the raw body.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String>;

    /// [`Upstream::get_json`] with an explicit `Accept` header, for APIs that
    /// version their responses by media type.
    async fn get_json_accepting(&self, url: &str, query: &[(&str, String)], _accept: &str) -> Result<Value> {
        self.get_json(url, query).await
    }
}

/// One aggregated source: how to collect it, where it lives in the cache,
/// and for how long.
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Record: Clone + Send + Sync + 'static;

    fn key(&self) -> SourceKey;

    fn ttl(&self) -> Duration;

    /// Fetches, merges, filters and caps the records. Branch failures inside a
    /// fan-out must already be absorbed here; an `Err` means the whole
    /// aggregation failed and nothing gets cached.
    async fn collect(&self, upstream: &dyn Upstream) -> Result<Vec<Self::Record>>;

    fn into_payload(records: Vec<Self::Record>) -> FeedPayload;

    /// `None` when the payload belongs to a different source.
    fn from_payload(payload: FeedPayload) -> Option<Vec<Self::Record>>;
}
