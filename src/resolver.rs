use crate::cache::{CacheStats, ScoreCache, SqliteCache};
use crate::config::EngineConfig;
use crate::core::{format_rating, Resolution};
use crate::error::Result;
use crate::normalize::{clean, extract_year};
use crate::ranking::{evaluate, rank, Evaluation};
use crate::sources::{CandidateSource, VivinoApiSource};
use std::sync::Arc;

/// Resolves a product name to a rating string, or [`crate::NOT_FOUND`].
///
/// Never fails: source errors, empty result sets and weak matches all come back
/// as "not found".
pub struct ScoreResolver {
    source: Arc<dyn CandidateSource>,
    cache: Option<Arc<dyn ScoreCache>>,
}

impl ScoreResolver {
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self { source, cache: None }
    }

    /// Reuse previously resolved scores from `cache`
    pub fn with_cache(mut self, cache: Arc<dyn ScoreCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Vivino API source, plus an SQLite cache when `db_path` is set and
    /// `use_cache` is on
    pub async fn from_config(config: &EngineConfig) -> Result<Self> {
        let source = VivinoApiSource::new(&config.vivino_base_url, config.request_timeout())?;
        let resolver = Self::new(Arc::new(source));

        match &config.db_path {
            Some(_) if !config.use_cache => {
                tracing::info!("📦 Score cache disabled");
                Ok(resolver)
            }
            Some(path) => {
                tracing::info!("📦 Score cache: {}", path);
                Ok(resolver.with_cache(Arc::new(SqliteCache::new(path).await?)))
            }
            None => Ok(resolver),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Rating text for `raw_name`, cache allowed
    pub async fn resolve(&self, raw_name: &str) -> String {
        self.resolve_detailed(raw_name, true).await.score
    }

    /// Full resolution outcome for `raw_name`
    pub async fn resolve_detailed(&self, raw_name: &str, use_cache: bool) -> Resolution {
        self.lookup(raw_name, use_cache, false).await.0
    }

    /// Resolution plus how each fetched candidate scored, from a single source
    /// request. The evaluations are empty on a cache hit or a source failure.
    pub async fn resolve_traced(&self, raw_name: &str, use_cache: bool) -> (Resolution, Vec<Evaluation>) {
        self.lookup(raw_name, use_cache, true).await
    }

    /// Whether the underlying source answers
    pub async fn source_available(&self) -> bool {
        self.source.is_available().await
    }

    async fn lookup(&self, raw_name: &str, use_cache: bool, traced: bool) -> (Resolution, Vec<Evaluation>) {
        let cleaned = clean(raw_name);
        let year = extract_year(raw_name);

        if use_cache {
            if let Some(hit) = self.cached(raw_name, &cleaned, year).await {
                return (hit, Vec::new());
            }
        }

        tracing::debug!("Searching for: '{}' (Year: {:?})", cleaned, year);

        let candidates = match self.source.search(&cleaned).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Source {} failed for '{}': {}", self.source.name(), raw_name, e);
                return (
                    Resolution::not_found(raw_name, cleaned, year, self.source.name()),
                    Vec::new(),
                );
            }
        };
        tracing::debug!("Found {} results", candidates.len());

        let evaluations = if traced {
            evaluate(&cleaned, year, &candidates)
        } else {
            Vec::new()
        };

        let best = match rank(&cleaned, year, &candidates) {
            Some(best) => best,
            None => {
                return (
                    Resolution::not_found(raw_name, cleaned, year, self.source.name()),
                    evaluations,
                )
            }
        };

        let score = format_rating(best.rating);
        tracing::info!(
            "✅ Selected: {} - Rating: {} (Match: {:.2})",
            best.candidate.name,
            score,
            best.adjusted_ratio
        );

        if use_cache {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.save(raw_name, &score, Some(best.candidate.name.as_str())).await {
                    tracing::warn!("Failed to save to cache: {}", e);
                }
            }
        }

        let resolution = Resolution {
            query: raw_name.to_string(),
            cleaned_name: cleaned,
            year,
            score,
            matched_name: Some(best.candidate.name),
            match_ratio: Some(best.adjusted_ratio),
            from_cache: false,
            source: self.source.name().to_string(),
        };
        (resolution, evaluations)
    }

    async fn cached(&self, raw_name: &str, cleaned: &str, year: Option<u16>) -> Option<Resolution> {
        let cache = self.cache.as_ref()?;

        let hit = match cache.get(raw_name).await {
            Ok(hit) => hit?,
            Err(e) => {
                tracing::warn!("Cache lookup failed for '{}': {}", raw_name, e);
                return None;
            }
        };

        if let Err(e) = cache.increment_hit(raw_name).await {
            tracing::warn!("Failed to count cache hit: {}", e);
        }
        tracing::debug!("Cache hit for '{}': {}", raw_name, hit.score);

        Some(Resolution {
            query: raw_name.to_string(),
            cleaned_name: cleaned.to_string(),
            year,
            score: hit.score,
            matched_name: hit.matched_name,
            match_ratio: None,
            from_cache: true,
            source: "cache".to_string(),
        })
    }

    /// Get cache statistics, `None` without a cache
    pub async fn cache_stats(&self) -> Result<Option<CacheStats>> {
        match &self.cache {
            Some(cache) => Ok(Some(cache.stats().await?)),
            None => Ok(None),
        }
    }

    /// Clean up old cache entries
    pub async fn cleanup_cache(&self, max_age_days: i64) -> Result<u64> {
        match &self.cache {
            Some(cache) => cache.cleanup(max_age_days).await,
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Candidate, NOT_FOUND};
    use crate::sources::StaticSource;

    fn margaux_source() -> StaticSource {
        StaticSource::new("fixture").with_results(
            "Château Margaux 2015",
            vec![
                Candidate::new("Château Margaux 2015", Some(4.2), 500),
                Candidate::new("Château Margaux 2010", Some(4.5), 800),
            ],
        )
    }

    #[tokio::test]
    async fn test_resolve_prefers_matching_vintage() {
        let resolver = ScoreResolver::new(Arc::new(margaux_source()));
        assert_eq!(resolver.resolve("Château Margaux 2015 75cl").await, "4.2");
    }

    #[tokio::test]
    async fn test_resolve_source_failure_is_not_found() {
        let resolver = ScoreResolver::new(Arc::new(StaticSource::new("fixture").failing("timeout")));
        assert_eq!(resolver.resolve("Château Margaux 2015").await, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resolve_no_candidates_is_not_found() {
        let resolver = ScoreResolver::new(Arc::new(StaticSource::new("fixture")));
        let res = resolver.resolve_detailed("Vin Blanc sec 3 L", true).await;
        assert_eq!(res.score, NOT_FOUND);
        assert_eq!(res.cleaned_name, "Vin Blanc sec");
        assert_eq!(res.year, None);
    }

    #[tokio::test]
    async fn test_resolve_detailed_reports_match() {
        let resolver = ScoreResolver::new(Arc::new(margaux_source()));
        let res = resolver.resolve_detailed("Château Margaux 2015", false).await;
        assert_eq!(res.matched_name.as_deref(), Some("Château Margaux 2015"));
        assert_eq!(res.match_ratio, Some(1.0));
        assert_eq!(res.year, Some(2015));
        assert_eq!(res.source, "fixture");
        assert!(!res.from_cache);
    }

    #[tokio::test]
    async fn test_cache_short_circuits_source() {
        let source = Arc::new(margaux_source());
        let cache = Arc::new(SqliteCache::new(":memory:").await.unwrap());
        let resolver = ScoreResolver::new(source.clone()).with_cache(cache.clone());

        assert_eq!(resolver.resolve("Château Margaux 2015").await, "4.2");
        let second = resolver.resolve_detailed("Château Margaux 2015", true).await;

        assert!(second.from_cache);
        assert_eq!(second.score, "4.2");
        assert_eq!(source.calls(), 1);

        let stats = resolver.cache_stats().await.unwrap().unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_hits, 1);
    }

    #[tokio::test]
    async fn test_not_found_is_never_cached() {
        let source = Arc::new(StaticSource::new("fixture"));
        let cache = Arc::new(SqliteCache::new(":memory:").await.unwrap());
        let resolver = ScoreResolver::new(source.clone()).with_cache(cache);

        assert_eq!(resolver.resolve("Barolo").await, NOT_FOUND);
        assert_eq!(resolver.resolve("Barolo").await, NOT_FOUND);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_resolve_traced_uses_one_fetch() {
        let source = Arc::new(margaux_source());
        let resolver = ScoreResolver::new(source.clone());

        let (res, evaluations) = resolver.resolve_traced("Château Margaux 2015", false).await;
        assert_eq!(res.score, "4.2");
        assert_eq!(evaluations.len(), 2);
        assert!(matches!(
            evaluations[1],
            Evaluation::Scored { year_mismatch: true, .. }
        ));
        assert_eq!(source.calls(), 1);

        let failing = ScoreResolver::new(Arc::new(StaticSource::new("fixture").failing("down")));
        let (res, evaluations) = failing.resolve_traced("Château Margaux 2015", false).await;
        assert_eq!(res.score, NOT_FOUND);
        assert!(evaluations.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_respects_use_cache() {
        let disabled = EngineConfig {
            db_path: Some(":memory:".to_string()),
            use_cache: false,
            ..EngineConfig::default()
        };
        let resolver = ScoreResolver::from_config(&disabled).await.unwrap();
        assert!(resolver.cache_stats().await.unwrap().is_none());

        let enabled = EngineConfig {
            db_path: Some(":memory:".to_string()),
            use_cache: true,
            ..EngineConfig::default()
        };
        let resolver = ScoreResolver::from_config(&enabled).await.unwrap();
        assert!(resolver.cache_stats().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_source_available() {
        let resolver = ScoreResolver::new(Arc::new(margaux_source()));
        assert!(resolver.source_available().await);

        let failing = ScoreResolver::new(Arc::new(StaticSource::new("fixture").failing("down")));
        assert!(!failing.source_available().await);
    }

    #[tokio::test]
    async fn test_no_cache_stats_without_cache() {
        let resolver = ScoreResolver::new(Arc::new(margaux_source()));
        assert!(resolver.cache_stats().await.unwrap().is_none());
        assert_eq!(resolver.cleanup_cache(0).await.unwrap(), 0);
    }
}
