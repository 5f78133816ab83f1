pub mod fixed;
pub mod vivino;

use async_trait::async_trait;
use crate::core::Candidate;
use crate::error::Result;

pub use fixed::StaticSource;
pub use vivino::VivinoApiSource;

/// Where rating candidates come from (Vivino API, fixtures, ...).
///
/// Implementations only fetch; picking the best candidate is
/// [`crate::ranking::rank`]'s job.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Search by cleaned product name, in the source's own relevance order
    async fn search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Get source name
    fn name(&self) -> &str;

    /// Check if source is reachable
    async fn is_available(&self) -> bool;
}
