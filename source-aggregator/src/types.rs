use std::time::Duration;

pub use interfaces::defs::{FeedPayload, ForumPost, PreprintRecord, Repository, SourceKey, Story};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Tech-Mastery-Lab/1.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub default_ttl_seconds: u64,
    /// Period of the background sweeper. Zero disables it.
    pub sweep_interval_seconds: u64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 300,
            sweep_interval_seconds: 60,
        }
    }
}

/// Upstream base URLs. Overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub hacker_news: String,
    pub github_search: String,
    pub reddit: String,
    pub arxiv_query: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            hacker_news: "https://hacker-news.firebaseio.com/v0".to_string(),
            github_search: "https://api.github.com/search/repositories".to_string(),
            reddit: "https://www.reddit.com".to_string(),
            arxiv_query: "http://export.arxiv.org/api/query".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// `None` falls back to the cache default TTL.
    pub news_ttl_seconds: Option<u64>,
    pub github_ttl_seconds: Option<u64>,
    pub reddit_ttl_seconds: Option<u64>,
    pub research_ttl_seconds: Option<u64>,
    pub forum_channels: Vec<String>,
    pub preprint_categories: Vec<String>,
    pub result_cap: usize,
    pub story_id_limit: usize,
    pub per_channel_limit: usize,
    pub per_category_limit: usize,
    pub trending_window_days: i64,
    pub endpoints: Endpoints,
}

impl SourcesConfig {
    pub fn ttl_for(&self, key: SourceKey, default_ttl: Duration) -> Duration {
        let seconds = match key {
            SourceKey::News => self.news_ttl_seconds,
            SourceKey::Github => self.github_ttl_seconds,
            SourceKey::Reddit => self.reddit_ttl_seconds,
            SourceKey::Research => self.research_ttl_seconds,
        };
        seconds.map(Duration::from_secs).unwrap_or(default_ttl)
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            news_ttl_seconds: None,
            github_ttl_seconds: Some(900),
            reddit_ttl_seconds: Some(600),
            research_ttl_seconds: Some(1800),
            forum_channels: [
                "programming",
                "technology",
                "webdev",
                "javascript",
                "python",
                "machinelearning",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            preprint_categories: ["cs.AI", "cs.LG", "cs.CV", "cs.CL", "cs.CR"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            result_cap: 100,
            story_id_limit: 100,
            per_channel_limit: 20,
            per_category_limit: 20,
            trending_window_days: 7,
            endpoints: Endpoints::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Upstream fetch failed for {source_key}: {message}")]
    UpstreamFetch { source_key: SourceKey, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    pub fn upstream(source_key: SourceKey, err: impl std::fmt::Display) -> Self {
        AggregatorError::UpstreamFetch {
            source_key,
            message: err.to_string(),
        }
    }

    /// Message to surface to a client. Upstream failures carry the upstream's
    /// own message rather than the wrapper text.
    pub fn client_message(&self) -> String {
        match self {
            AggregatorError::UpstreamFetch { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
