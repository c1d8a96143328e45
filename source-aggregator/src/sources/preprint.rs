use crate::fanout::{merge_filtered, settle_all};
use crate::parser::EntryExtractor;
use crate::traits::{FeedSource, Upstream};
use crate::types::{FeedPayload, PreprintRecord, Result, SourceKey, SourcesConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Newest preprints per category, scraped from the Atom query API.
pub struct PreprintSource {
    query_url: String,
    categories: Vec<String>,
    per_category_limit: usize,
    cap: usize,
    ttl: Duration,
}

impl PreprintSource {
    pub fn new(config: &SourcesConfig, default_ttl: Duration) -> Self {
        Self {
            query_url: config.endpoints.arxiv_query.clone(),
            categories: config.preprint_categories.clone(),
            per_category_limit: config.per_category_limit,
            cap: config.result_cap,
            ttl: config.ttl_for(SourceKey::Research, default_ttl),
        }
    }

    async fn fetch_category(&self, upstream: &dyn Upstream, category: &str) -> Result<Vec<PreprintRecord>> {
        let query = [
            ("search_query", format!("cat:{}", category)),
            ("start", "0".to_string()),
            ("max_results", self.per_category_limit.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ];
        let body = upstream.get_text(&self.query_url, &query).await?;
        Ok(EntryExtractor::extract(&body, category))
    }
}

#[async_trait]
impl FeedSource for PreprintSource {
    type Record = PreprintRecord;

    fn key(&self) -> SourceKey {
        SourceKey::Research
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn collect(&self, upstream: &dyn Upstream) -> Result<Vec<PreprintRecord>> {
        let branches = self
            .categories
            .iter()
            .map(|category| (category.as_str(), self.fetch_category(upstream, category)))
            .collect();
        let parts = settle_all(SourceKey::Research, branches).await;

        Ok(merge_filtered(parts, self.cap, |record| record.title.is_some()))
    }

    fn into_payload(records: Vec<PreprintRecord>) -> FeedPayload {
        FeedPayload::Preprints(records)
    }

    fn from_payload(payload: FeedPayload) -> Option<Vec<PreprintRecord>> {
        match payload {
            FeedPayload::Preprints(records) => Some(records),
            _ => None,
        }
    }
}
