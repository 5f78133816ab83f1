use serde::Serialize;
use std::time::Duration;

use crate::core::WineListing;
use crate::resolver::ScoreResolver;

/// Batch enrichment settings
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Pause after each external lookup
    pub delay: Duration,
    /// Re-resolve listings that already carry a numeric score
    pub force: bool,
    pub use_cache: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            force: false,
            use_cache: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichSummary {
    pub resolved: usize,
    pub not_found: usize,
    pub skipped: usize,
}

/// Fill in `vivino_score` for each listing, one at a time.
///
/// Lookups are sequential with `options.delay` between external requests; cache
/// hits and skipped listings do not wait.
pub async fn enrich(resolver: &ScoreResolver, listings: &mut [WineListing], options: &EnrichOptions) -> EnrichSummary {
    let mut summary = EnrichSummary::default();
    let total = listings.len();

    for (i, listing) in listings.iter_mut().enumerate() {
        if !options.force && listing.has_score() {
            summary.skipped += 1;
            continue;
        }

        tracing::info!("[{}/{}] Fetching score for: {}", i + 1, total, listing.name);
        let resolution = resolver.resolve_detailed(&listing.name, options.use_cache).await;
        tracing::info!("  → Score: {}", resolution.score);

        if resolution.is_found() {
            summary.resolved += 1;
        } else {
            summary.not_found += 1;
        }
        listing.vivino_score = resolution.score;

        if !resolution.from_cache && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    tracing::info!(
        "Enrichment done: {} resolved, {} not found, {} skipped",
        summary.resolved,
        summary.not_found,
        summary.skipped
    );
    summary
}
