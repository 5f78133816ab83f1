use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::core::Candidate;
use crate::error::{Result, WineEngineError};
use crate::sources::CandidateSource;

pub const DEFAULT_BASE_URL: &str = "https://www.vivino.com/api";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Vivino explore API source
pub struct VivinoApiSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize, Default)]
struct ExploreResponse {
    #[serde(default)]
    explore_vintage: Option<ExploreVintage>,
}

#[derive(Debug, Deserialize, Default)]
struct ExploreVintage {
    /// Kept raw so one malformed entry does not sink the whole page
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
struct ExploreMatch {
    #[serde(default)]
    vintage: VintageData,
}

#[derive(Debug, Deserialize, Default)]
struct VintageData {
    #[serde(default)]
    wine: WineData,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize, Default)]
struct WineData {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize, Default)]
struct Statistics {
    #[serde(default)]
    ratings_average: serde_json::Value,
    #[serde(default)]
    ratings_count: serde_json::Value,
}

impl VivinoApiSource {
    /// Create new Vivino source against `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn explore_url(&self, query: &str) -> String {
        // The API rejects queries without at least one filter, hence min_rating
        format!(
            "{}/explore/explore?q={}&page=1&language=en&min_rating=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn source_error(message: String) -> WineEngineError {
        WineEngineError::source_error("vivino", message)
    }

    /// Turn one raw explore match into a candidate, tolerating missing fields
    fn to_candidate(raw: serde_json::Value) -> Candidate {
        let entry: ExploreMatch = serde_json::from_value(raw).unwrap_or_default();
        let stats = entry.vintage.statistics;

        let normalized = serde_json::json!({
            "name": entry.vintage.wine.name,
            "rating": stats.ratings_average,
            "rating_count": stats.ratings_count,
        });
        serde_json::from_value(normalized).unwrap_or_else(|e| {
            tracing::debug!("Unreadable explore match: {}", e);
            Candidate::new("", None, 0)
        })
    }

    /// Parse an explore response body
    fn parse_matches(body: &str) -> Result<Vec<Candidate>> {
        let response: ExploreResponse =
            serde_json::from_str(body).map_err(|e| Self::source_error(format!("Invalid JSON: {}", e)))?;

        Ok(response
            .explore_vintage
            .map(|ev| ev.matches)
            .unwrap_or_default()
            .into_iter()
            .map(Self::to_candidate)
            .collect())
    }
}

#[async_trait]
impl CandidateSource for VivinoApiSource {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        let url = self.explore_url(query);
        tracing::debug!("Vivino request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::source_error(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::source_error(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::source_error(format!("Reading body failed: {}", e)))?;

        let candidates = Self::parse_matches(&body)?;
        tracing::debug!("Vivino returned {} results for '{}'", candidates.len(), query);
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "vivino"
    }

    async fn is_available(&self) -> bool {
        self.search("Château Margaux").await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explore_url_encodes_query() {
        let source = VivinoApiSource::new("https://example.test/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.explore_url("Château Margaux"),
            "https://example.test/api/explore/explore?q=Ch%C3%A2teau%20Margaux&page=1&language=en&min_rating=1"
        );
    }

    #[test]
    fn test_parse_matches_preserves_order() {
        let body = r#"{
            "explore_vintage": {
                "matches": [
                    {"vintage": {"wine": {"name": "Château Margaux 2015"},
                                 "statistics": {"ratings_average": 4.2, "ratings_count": 500}}},
                    {"vintage": {"wine": {"name": "Château Margaux 2010"},
                                 "statistics": {"ratings_average": 4.5, "ratings_count": 800}}}
                ]
            }
        }"#;

        let candidates = VivinoApiSource::parse_matches(body).unwrap();
        assert_eq!(
            candidates,
            vec![
                Candidate::new("Château Margaux 2015", Some(4.2), 500),
                Candidate::new("Château Margaux 2010", Some(4.5), 800),
            ]
        );
    }

    #[test]
    fn test_parse_matches_tolerates_malformed_entries() {
        let body = r#"{
            "explore_vintage": {
                "matches": [
                    {"vintage": null},
                    {"vintage": {"wine": {"name": "Rioja"}, "statistics": {"ratings_average": "n/a"}}},
                    {"vintage": {"wine": {"name": "Rioja Crianza"},
                                 "statistics": {"ratings_average": 3.7, "ratings_count": 42}}}
                ]
            }
        }"#;

        let candidates = VivinoApiSource::parse_matches(body).unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(!candidates[0].is_eligible());
        assert_eq!(candidates[1], Candidate::new("Rioja", None, 0));
        assert!(candidates[2].is_eligible());
    }

    #[test]
    fn test_parse_matches_without_results() {
        assert!(VivinoApiSource::parse_matches("{}").unwrap().is_empty());
        assert!(VivinoApiSource::parse_matches(r#"{"explore_vintage": {}}"#).unwrap().is_empty());
        assert!(VivinoApiSource::parse_matches("<html>").is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_vivino_search() {
        let source = VivinoApiSource::new(DEFAULT_BASE_URL, Duration::from_secs(10)).unwrap();
        let results = source.search("Château Margaux").await.unwrap();
        assert!(!results.is_empty());
    }
}
