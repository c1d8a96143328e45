#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use source_aggregator::{AggregatorError, Endpoints, Result, SourcesConfig, Upstream};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

pub const HN: &str = "http://hn.test/v0";
pub const GITHUB: &str = "http://github.test/search/repositories";
pub const REDDIT: &str = "http://reddit.test";
pub const ARXIV: &str = "http://arxiv.test/api/query";

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn test_sources() -> SourcesConfig {
    SourcesConfig {
        endpoints: Endpoints {
            hacker_news: HN.to_string(),
            github_search: GITHUB.to_string(),
            reddit: REDDIT.to_string(),
            arxiv_query: ARXIV.to_string(),
        },
        ..SourcesConfig::default()
    }
}

#[derive(Clone)]
enum Reply {
    Json(Value),
    Text(String),
    Fail(String),
}

/// Scripted upstream keyed by URL. A reply scripted under `url?name=value`
/// takes precedence for requests carrying that query pair; otherwise the query
/// is only recorded. Unscripted URLs fail. Replies may be delayed.
#[derive(Default)]
pub struct FakeUpstream {
    replies: Mutex<HashMap<String, (Reply, Duration)>>,
    calls: AtomicUsize,
    log: Mutex<Vec<(String, Vec<(String, String)>)>>,
    accepts: Mutex<Vec<(String, String)>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, url: impl Into<String>, body: Value) -> Self {
        self.reply(url, Reply::Json(body), Duration::ZERO)
    }

    pub fn json_delayed(self, url: impl Into<String>, body: Value, delay: Duration) -> Self {
        self.reply(url, Reply::Json(body), delay)
    }

    pub fn text(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.reply(url, Reply::Text(body.into()), Duration::ZERO)
    }

    pub fn text_delayed(self, url: impl Into<String>, body: impl Into<String>, delay: Duration) -> Self {
        self.reply(url, Reply::Text(body.into()), delay)
    }

    pub fn fail(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.reply(url, Reply::Fail(message.into()), Duration::ZERO)
    }

    fn reply(self, url: impl Into<String>, reply: Reply, delay: Duration) -> Self {
        self.replies.lock().unwrap().insert(url.into(), (reply, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.log.lock().unwrap().clone()
    }

    /// `(url, accept)` for every call that asked for a specific media type.
    pub fn accepts(&self) -> Vec<(String, String)> {
        self.accepts.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str, query: &[(&str, String)]) -> Option<(Reply, Duration)> {
        let replies = self.replies.lock().unwrap();
        let scripted = query
            .iter()
            .find_map(|(name, value)| replies.get(&format!("{url}?{name}={value}")))
            .or_else(|| replies.get(url))
            .cloned();
        scripted
    }

    async fn answer(&self, url: &str, query: &[(&str, String)]) -> Result<Reply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push((
            url.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));

        let (reply, delay) = self.lookup(url, query).ok_or_else(|| AggregatorError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Fail(message) => Err(AggregatorError::General(message)),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        match self.answer(url, query).await? {
            Reply::Json(value) => Ok(value),
            _ => Err(AggregatorError::General(format!("{} is not JSON", url))),
        }
    }

    async fn get_json_accepting(&self, url: &str, query: &[(&str, String)], accept: &str) -> Result<Value> {
        self.accepts.lock().unwrap().push((url.to_string(), accept.to_string()));
        self.get_json(url, query).await
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        match self.answer(url, query).await? {
            Reply::Text(body) => Ok(body),
            Reply::Json(value) => Ok(value.to_string()),
            Reply::Fail(message) => Err(AggregatorError::General(message)),
        }
    }
}

pub fn story(id: u64, title: &str) -> Value {
    json!({ "id": id, "type": "story", "by": "pg", "title": title, "score": 10, "url": format!("https://example.com/{}", id) })
}

pub fn listing(titles: &[&str]) -> Value {
    let children: Vec<Value> = titles
        .iter()
        .map(|t| json!({ "kind": "t3", "data": { "title": t, "score": 1 } }))
        .collect();
    json!({ "kind": "Listing", "data": { "children": children } })
}

pub fn atom_feed(entries: &[(&str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, title)| {
            format!(
                "<entry>\n  <id>{id}</id>\n  <published>2024-05-01T00:00:00Z</published>\n  <title>{title}</title>\n  <summary>About {id}</summary>\n  <author><name>Author {id}</name></author>\n</entry>\n"
            )
        })
        .collect();
    format!("<?xml version=\"1.0\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n<title>query</title>\n{body}</feed>")
}

pub fn aggregator(upstream: &std::sync::Arc<FakeUpstream>, sources: &SourcesConfig) -> source_aggregator::ContentAggregator {
    let cache = std::sync::Arc::new(source_aggregator::FeedCache::new(Duration::from_secs(300)));
    source_aggregator::ContentAggregator::new(upstream.clone(), cache, sources)
}
