use crate::cache::TtlCache;
use crate::fetcher::Fetcher;
use crate::sources::{ForumSource, NewsSource, PreprintSource, TrendingSource};
use crate::traits::{FeedSource, Upstream};
use crate::types::{
    AggregatorError, CacheConfig, FeedPayload, FetchConfig, ForumPost, PreprintRecord, Repository, Result,
    SourcesConfig, Story,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Shared cache of aggregated payloads, one entry per [`crate::SourceKey`].
pub type FeedCache = TtlCache<FeedPayload>;

/// Entry point for the four sources. Cheap to share behind an `Arc`; the
/// cache is the only mutable state and is safe for concurrent use.
pub struct ContentAggregator {
    upstream: Arc<dyn Upstream>,
    cache: Arc<FeedCache>,
    news: NewsSource,
    trending: TrendingSource,
    forum: ForumSource,
    preprints: PreprintSource,
}

impl ContentAggregator {
    pub fn new(upstream: Arc<dyn Upstream>, cache: Arc<FeedCache>, sources: &SourcesConfig) -> Self {
        let default_ttl = cache.default_ttl();

        Self {
            upstream,
            news: NewsSource::new(sources, default_ttl),
            trending: TrendingSource::new(sources, default_ttl),
            forum: ForumSource::new(sources, default_ttl),
            preprints: PreprintSource::new(sources, default_ttl),
            cache,
        }
    }

    /// Builds the reqwest fetcher and a fresh cache from configuration.
    pub fn with_fetcher(fetch_config: FetchConfig, cache_config: &CacheConfig, sources: &SourcesConfig) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(fetch_config)?);
        let cache = Arc::new(FeedCache::new(cache_config.default_ttl()));
        Ok(Self::new(fetcher, cache, sources))
    }

    pub fn cache(&self) -> &Arc<FeedCache> {
        &self.cache
    }

    pub async fn get_news(&self) -> Result<Vec<Story>> {
        self.load(&self.news).await
    }

    pub async fn get_trending_repositories(&self) -> Result<Vec<Repository>> {
        self.load(&self.trending).await
    }

    pub async fn get_forum_posts(&self) -> Vec<ForumPost> {
        self.load(&self.forum).await.unwrap_or_else(|e| {
            error!(error = %e, "Forum aggregation failed");
            Vec::new()
        })
    }

    pub async fn get_preprints(&self) -> Vec<PreprintRecord> {
        self.load(&self.preprints).await.unwrap_or_else(|e| {
            error!(error = %e, "Preprint aggregation failed");
            Vec::new()
        })
    }

    /// Cache check, then collect on a miss and store the result under the
    /// source's key and TTL. Failures are never cached.
    async fn load<S: FeedSource>(&self, source: &S) -> Result<Vec<S::Record>> {
        let key = source.key();

        if let Some(payload) = self.cache.get(key.as_str()) {
            let items = payload.len();
            match S::from_payload(payload) {
                Some(records) => {
                    debug!(source = %key, items, "Returning cached records");
                    return Ok(records);
                }
                None => warn!(source = %key, "Cached payload has the wrong shape, refetching"),
            }
        }

        info!(source = %key, "Cache miss, fetching upstream");
        let start_time = Instant::now();

        match source.collect(self.upstream.as_ref()).await {
            Ok(records) => {
                self.cache
                    .set(key.as_str(), S::into_payload(records.clone()), source.ttl());
                info!(
                    source = %key,
                    items = records.len(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Aggregated records"
                );
                Ok(records)
            }
            Err(e) => {
                error!(source = %key, error = %e, "Aggregation failed");
                Err(match e {
                    e @ AggregatorError::UpstreamFetch { .. } => e,
                    other => AggregatorError::upstream(key, other),
                })
            }
        }
    }
}
