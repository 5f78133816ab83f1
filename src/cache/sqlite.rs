use rusqlite::{Connection, params, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::{ScoreCache, CachedScore, CacheStats};
use crate::error::{Result, WineEngineError};

/// SQLite-based score cache
///
/// ```sql
/// CREATE TABLE score_cache (
///     name TEXT PRIMARY KEY,
///     score TEXT NOT NULL,
///     matched_name TEXT,
///     hit_count INTEGER DEFAULT 0,
///     cached_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

/// Parse a stored timestamp: RFC 3339 text or Unix seconds
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| raw.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0)))
}

impl SqliteCache {
    /// Open (or create) the cache at `db_path`; `":memory:"` for a throwaway one
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS score_cache (
                name TEXT PRIMARY KEY,
                score TEXT NOT NULL,
                matched_name TEXT,
                hit_count INTEGER DEFAULT 0,
                cached_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_score_cached_at ON score_cache(cached_at)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Normalize names for consistent cache lookups
    fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| WineEngineError::Cache("connection lock poisoned".to_string()))
    }

    fn boundary_entry(conn: &Connection, sql: &str) -> Option<DateTime<Utc>> {
        conn.query_row(sql, [], |row| {
            row.get::<_, Option<String>>(0)
                .or_else(|_| row.get::<_, Option<i64>>(0).map(|ts| ts.map(|t| t.to_string())))
        })
        .ok()
        .flatten()
        .and_then(|s| parse_timestamp(&s))
    }
}

#[async_trait]
impl ScoreCache for SqliteCache {
    async fn get(&self, name: &str) -> Result<Option<CachedScore>> {
        let normalized = Self::normalize_name(name);
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT name, score, matched_name, hit_count, cached_at
                 FROM score_cache
                 WHERE name = ?",
                params![normalized],
                |row| {
                    let cached_at = row
                        .get::<_, String>(4)
                        .ok()
                        .and_then(|s| parse_timestamp(&s))
                        .or_else(|| {
                            row.get::<_, i64>(4)
                                .ok()
                                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                        })
                        .unwrap_or_else(Utc::now);

                    Ok(CachedScore {
                        name: row.get(0)?,
                        score: row.get(1)?,
                        matched_name: row.get(2)?,
                        hit_count: row.get(3)?,
                        cached_at,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    async fn save(&self, name: &str, score: &str, matched_name: Option<&str>) -> Result<()> {
        let normalized = Self::normalize_name(name);
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO score_cache (name, score, matched_name, hit_count, cached_at)
             VALUES (?1, ?2, ?3, COALESCE((SELECT hit_count FROM score_cache WHERE name = ?1), 0), ?4)",
            params![normalized, score, matched_name, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    async fn increment_hit(&self, name: &str) -> Result<()> {
        let normalized = Self::normalize_name(name);
        let conn = self.conn()?;

        conn.execute(
            "UPDATE score_cache SET hit_count = hit_count + 1 WHERE name = ?",
            params![normalized],
        )?;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let conn = self.conn()?;

        let total_entries: u64 = conn.query_row("SELECT COUNT(*) FROM score_cache", [], |row| row.get(0))?;

        let total_hits: u64 = conn.query_row(
            "SELECT COALESCE(SUM(hit_count), 0) FROM score_cache",
            [],
            |row| row.get(0),
        )?;

        let avg_hit_count = if total_entries > 0 {
            total_hits as f64 / total_entries as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries,
            total_hits,
            avg_hit_count,
            oldest_entry: Self::boundary_entry(&conn, "SELECT MIN(cached_at) FROM score_cache"),
            newest_entry: Self::boundary_entry(&conn, "SELECT MAX(cached_at) FROM score_cache"),
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        let conn = self.conn()?;

        let cutoff_date = Utc::now() - chrono::Duration::days(max_age_days);

        let deleted = conn.execute(
            "DELETE FROM score_cache WHERE cached_at < ?",
            params![cutoff_date.to_rfc3339()],
        )?;

        Ok(deleted as u64)
    }
}
