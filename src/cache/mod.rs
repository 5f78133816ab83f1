pub mod sqlite;

use async_trait::async_trait;
use crate::error::Result;

pub use sqlite::SqliteCache;

/// Trait for resolved-score cache implementations
#[async_trait]
pub trait ScoreCache: Send + Sync {
    /// Get cached score by raw product name
    async fn get(&self, name: &str) -> Result<Option<CachedScore>>;

    /// Save a resolved score
    async fn save(&self, name: &str, score: &str, matched_name: Option<&str>) -> Result<()>;

    /// Increment cache hit counter
    async fn increment_hit(&self, name: &str) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Clear expired entries (older than `max_age_days`)
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Cached score with metadata
#[derive(Debug, Clone)]
pub struct CachedScore {
    pub name: String,
    pub score: String,
    pub matched_name: Option<String>,
    pub hit_count: i32,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_hits: u64,
    pub avg_hit_count: f64,
    pub oldest_entry: Option<chrono::DateTime<chrono::Utc>>,
    pub newest_entry: Option<chrono::DateTime<chrono::Utc>>,
}
