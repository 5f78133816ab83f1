use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::Candidate;
use crate::error::{Result, WineEngineError};
use crate::sources::CandidateSource;

/// In-memory source answering from a fixed query -> candidates table.
///
/// Unknown queries return no candidates. Used for offline runs and tests.
pub struct StaticSource {
    name: String,
    results: HashMap<String, Vec<Candidate>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: HashMap::new(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Register the candidates returned for an exact cleaned query
    pub fn with_results(mut self, query: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        self.results.insert(query.into(), candidates);
        self
    }

    /// Make every search fail with `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of searches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(WineEngineError::source_error(self.name.clone(), message.clone()));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_lookup() {
        let source = StaticSource::new("fixture")
            .with_results("Rioja", vec![Candidate::new("Rioja Crianza", Some(3.7), 42)]);

        let found = tokio_test::block_on(source.search("Rioja")).unwrap();
        assert_eq!(found.len(), 1);

        let missing = tokio_test::block_on(source.search("Barolo")).unwrap();
        assert!(missing.is_empty());
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_static_source_failure() {
        let source = StaticSource::new("fixture").failing("timeout");
        assert!(tokio_test::block_on(source.search("Rioja")).is_err());
        assert!(!tokio_test::block_on(source.is_available()));
    }
}
