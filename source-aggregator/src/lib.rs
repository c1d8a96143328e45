pub mod aggregator;
pub mod cache;
pub mod fanout;
pub mod fetcher;
pub mod parser;
pub mod server;
pub mod sources;
pub mod traits;
pub mod types;

pub use aggregator::{ContentAggregator, FeedCache};
pub use cache::{CacheStats, TtlCache};
pub use fetcher::Fetcher;
pub use parser::EntryExtractor;
pub use server::{create_router, AppState};
pub use traits::{FeedSource, Upstream};
pub use types::*;
