use serde::{Deserialize, Serialize};

/// Score placeholder for wines without a usable rating.
///
/// Stored and displayed as-is downstream; never change its value.
pub const NOT_FOUND: &str = "N/A";

/// Render a rating the way stored scores are written: integral values keep one
/// decimal (`4.0`, not `4`).
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

/// Outcome of resolving one product name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    /// Raw product name as given
    pub query: String,

    /// Name sent to the rating source
    pub cleaned_name: String,

    /// Vintage found in the raw name
    pub year: Option<u16>,

    /// Rating text or [`NOT_FOUND`]
    pub score: String,

    /// Name of the winning candidate
    #[serde(default)]
    pub matched_name: Option<String>,

    /// Similarity ratio of the winning candidate
    #[serde(default)]
    pub match_ratio: Option<f64>,

    pub from_cache: bool,

    /// Source that produced the score ("cache" on cache hits)
    pub source: String,
}

impl Resolution {
    /// Resolution that found nothing
    pub fn not_found(
        query: impl Into<String>,
        cleaned_name: impl Into<String>,
        year: Option<u16>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            cleaned_name: cleaned_name.into(),
            year,
            score: NOT_FOUND.to_string(),
            matched_name: None,
            match_ratio: None,
            from_cache: false,
            source: source.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.score != NOT_FOUND
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        match (&self.matched_name, self.match_ratio) {
            (Some(name), Some(ratio)) => format!(
                "{} → {} ({}, match {:.2}) [{}]",
                self.query, self.score, name, ratio, self.source
            ),
            _ => format!("{} → {} [{}]", self.query, self.score, self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(3.7), "3.7");
        assert_eq!(format_rating(4.0), "4.0");
        assert_eq!(format_rating(4.25), "4.25");
    }

    #[test]
    fn test_not_found_resolution() {
        let res = Resolution::not_found("Vin Blanc sec 3 L", "Vin Blanc sec", None, "vivino");
        assert_eq!(res.score, NOT_FOUND);
        assert!(!res.is_found());
        assert_eq!(res.display(), "Vin Blanc sec 3 L → N/A [vivino]");
    }
}
