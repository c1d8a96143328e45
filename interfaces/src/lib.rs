pub mod defs;

pub use defs::{FeedPayload, ForumPost, PreprintRecord, Repository, SourceKey, Story};
