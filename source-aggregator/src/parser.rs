use crate::types::PreprintRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// Entry blocks and free-text fields may span lines. Single-token fields
// (author name, id, timestamp) are matched on one line only.
static ENTRY: LazyLock<Regex> = LazyLock::new(|| field_pattern("entry", true));
static TITLE: LazyLock<Regex> = LazyLock::new(|| field_pattern("title", true));
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| field_pattern("summary", true));
static AUTHOR_NAME: LazyLock<Regex> = LazyLock::new(|| field_pattern("name", false));
static LINK_ID: LazyLock<Regex> = LazyLock::new(|| field_pattern("id", false));
static PUBLISHED: LazyLock<Regex> = LazyLock::new(|| field_pattern("published", false));

fn field_pattern(tag: &str, multiline: bool) -> Regex {
    let flags = if multiline { "(?s)" } else { "" };
    // tag names are fixed literals, so the pattern always compiles
    Regex::new(&format!("{flags}<{tag}>(.*?)</{tag}>")).expect("static field pattern")
}

/// Tolerant scraper for the preprint server's Atom response.
///
/// Grammar: the document is any text containing zero or more
/// `<entry>...</entry>` blocks; a block contains zero or one of each scalar
/// field and zero or more `<name>` elements. Anything else is ignored. A
/// missing field yields `None`, never an error.
pub struct EntryExtractor;

impl EntryExtractor {
    /// Splits `content` into entry blocks and extracts one record per block,
    /// in document order. Blocks without a title are kept; the caller decides
    /// whether to drop them.
    pub fn extract(content: &str, category: &str) -> Vec<PreprintRecord> {
        let records: Vec<PreprintRecord> = ENTRY
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|block| Self::extract_block(block.as_str(), category))
            .collect();

        let untitled = records.iter().filter(|r| r.title.is_none()).count();
        if untitled > 0 {
            debug!(category, untitled, "Entry blocks without a title");
        }
        debug!(category, entries = records.len(), "Extracted preprint entries");

        records
    }

    fn extract_block(block: &str, category: &str) -> PreprintRecord {
        PreprintRecord {
            title: first_field(&TITLE, block),
            summary: first_field(&SUMMARY, block),
            authors: AUTHOR_NAME
                .captures_iter(block)
                .filter_map(|caps| caps.get(1))
                .map(|name| name.as_str().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            link: first_field(&LINK_ID, block),
            published_at: first_field(&PUBLISHED, block),
            category: category.to_string(),
        }
    }
}

/// First match of `pattern`, trimmed. Empty after trimming counts as absent.
fn first_field(pattern: &Regex, block: &str) -> Option<String> {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
