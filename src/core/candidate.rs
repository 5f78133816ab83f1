use serde::{Deserialize, Serialize};

/// Minimum number of ratings a candidate needs before its average is trusted
pub const MIN_RATING_COUNT: u32 = 5;

/// Deserialize a rating from a number, a numeric string or anything else.
///
/// Sources are not consistent here: the API returns floats, scraped pages return
/// text such as `"3,7"`. Anything that does not parse is treated as "no rating".
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RatingValue {
        Float(f64),
        String(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RatingValue>::deserialize(deserializer)? {
        Some(RatingValue::Float(f)) => Some(f),
        Some(RatingValue::String(s)) => parse_rating(&s),
        Some(RatingValue::Other(_)) | None => None,
    }
    .filter(|r| r.is_finite()))
}

/// Deserialize a rating count, tolerating `null` and garbage as zero.
///
/// Fractional counts are truncated toward zero.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate_count)),
            serde_json::Value::String(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate_count))
            }
            _ => None,
        })
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(0))
}

fn truncate_count(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u64)
}

/// Parse a rating as text, accepting a comma decimal separator
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
}

/// A search result returned by a rating source for one query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Wine name as listed by the source
    #[serde(default)]
    pub name: String,

    /// Average rating, absent when the source has none
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<f64>,

    /// Number of ratings behind the average
    #[serde(default, deserialize_with = "deserialize_count")]
    pub rating_count: u32,
}

impl Candidate {
    pub fn new(name: impl Into<String>, rating: Option<f64>, rating_count: u32) -> Self {
        Self {
            name: name.into(),
            rating,
            rating_count,
        }
    }

    /// Rating usable for matching, if any.
    ///
    /// A zero average counts as missing, same as an absent one.
    pub fn usable_rating(&self) -> Option<f64> {
        self.rating.filter(|r| r.is_finite() && *r != 0.0)
    }

    /// Whether this candidate may take part in matching at all
    pub fn is_eligible(&self) -> bool {
        self.usable_rating().is_some() && self.rating_count >= MIN_RATING_COUNT
    }
}

/// A candidate selected by the ranker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub candidate: Candidate,

    /// Similarity ratio before any year penalty (0.0 - 1.0)
    pub ratio: f64,

    /// Ratio after the year penalty, may go negative
    pub adjusted_ratio: f64,

    /// Rating carried over from the candidate
    pub rating: f64,
}
