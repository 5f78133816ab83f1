//! # Wine Rating Engine
//!
//! Enriches scraped wine listings with third-party ratings:
//! - Product name cleanup (volume, packaging and ABV noise, vintage extraction)
//! - Ratcliff-Obershelp candidate ranking with vintage veto
//! - Pluggable rating sources (Vivino API, in-memory fixtures)
//! - SQLite cache of resolved scores
//! - Interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wine_rating_engine::{ScoreResolver, sources::VivinoApiSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = VivinoApiSource::new("https://www.vivino.com/api", std::time::Duration::from_secs(10))?;
//!     let resolver = ScoreResolver::new(Arc::new(source));
//!
//!     let score = resolver.resolve("Château Margaux 2015 75cl").await;
//!     println!("Vivino score: {}", score);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod normalize;
pub mod ranking;
pub mod resolver;
pub mod sources;
pub mod error;

// Re-export primary types
pub use self::core::{Candidate, Match, Resolution, WineListing, NOT_FOUND};
pub use config::EngineConfig;
pub use enrich::{enrich, EnrichOptions, EnrichSummary};
pub use resolver::ScoreResolver;
pub use error::{WineEngineError, Result};
pub use cache::ScoreCache;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
