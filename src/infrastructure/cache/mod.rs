pub mod coalesce;
pub mod post_cache;
pub mod query_cache;

pub use coalesce::QueryCoalescer;
pub use post_cache::PostCacheService;
pub use query_cache::QueryCache;
