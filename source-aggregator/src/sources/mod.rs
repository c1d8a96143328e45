pub mod forum;
pub mod news;
pub mod preprint;
pub mod trending;

pub use forum::ForumSource;
pub use news::NewsSource;
pub use preprint::PreprintSource;
pub use trending::{trending_query, TrendingSource, SEARCH_ACCEPT};
