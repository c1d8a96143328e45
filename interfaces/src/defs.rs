use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Logical cache key of one aggregated source. Each source owns exactly one
/// cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKey {
    News,
    Github,
    Reddit,
    Research,
}

impl SourceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::News => "news",
            SourceKey::Github => "github",
            SourceKey::Reddit => "reddit",
            SourceKey::Research => "research",
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news story as served by the story-detail endpoint.
///
/// Only the fields the pipeline reads are typed. Everything else, explicit
/// nulls included, stays in `extra` and is served back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Story {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// A repository from the code-hosting search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A forum post, tagged with the channel it was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    /// Channel the post was fetched under. Set by the aggregator, not upstream.
    #[serde(default)]
    pub subreddit_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForumPost {
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }
}

/// One entry extracted from the preprint server's Atom-like response.
///
/// Every field may be absent; records without a title never leave the
/// aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprintRecord {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub authors: Vec<String>,
    pub link: Option<String>,
    #[serde(rename = "published")]
    pub published_at: Option<String>,
    pub category: String,
}

/// Value stored in the shared cache, one variant per source.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPayload {
    Stories(Vec<Story>),
    Repositories(Vec<Repository>),
    Posts(Vec<ForumPost>),
    Preprints(Vec<PreprintRecord>),
}

impl FeedPayload {
    pub fn len(&self) -> usize {
        match self {
            FeedPayload::Stories(items) => items.len(),
            FeedPayload::Repositories(items) => items.len(),
            FeedPayload::Posts(items) => items.len(),
            FeedPayload::Preprints(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Object style note:
// Records are plain data. Upstream fields that are not named above survive in
// `extra` so that the served JSON matches what the upstream returned.
