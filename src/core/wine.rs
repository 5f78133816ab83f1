use serde::{Deserialize, Serialize};

use crate::core::candidate::parse_rating;
use crate::core::resolution::NOT_FOUND;

fn default_image_url() -> String {
    "https://upload.wikimedia.org/wikipedia/commons/a/ac/No_image_available.svg".to_string()
}

fn default_score() -> String {
    NOT_FOUND.to_string()
}

fn default_link() -> String {
    "#".to_string()
}

/// Wine colour/style inferred from the product name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WineType {
    Red,
    White,
    #[serde(rename = "Rosé")]
    Rose,
    Sparkling,
    #[default]
    Other,
}

impl WineType {
    /// Infer the type from keywords in the name. First matching group wins.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has_any(&["rouge", "red", "merlot", "cabernet", "syrah", "pinot noir"]) {
            WineType::Red
        } else if has_any(&["blanc", "white", "chardonnay", "sauvignon"]) {
            WineType::White
        } else if has_any(&["rosé", "rose"]) {
            WineType::Rose
        } else if has_any(&["champagne", "cava", "prosecco", "sparkling", "crémant"]) {
            WineType::Sparkling
        } else {
            WineType::Other
        }
    }
}

/// Bottle format inferred from the product name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BottleSize {
    #[serde(rename = "25cl")]
    Small,
    Box,
    #[serde(rename = "75cl")]
    Standard,
    #[default]
    Other,
}

impl BottleSize {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has_any(&["25cl", "25 cl"]) {
            BottleSize::Small
        } else if has_any(&["3 l", "3l", "bib", "box", "bag in box"]) {
            BottleSize::Box
        } else if has_any(&["75cl", "75 cl"]) {
            BottleSize::Standard
        } else {
            BottleSize::Other
        }
    }
}

/// Numeric value of a stored score, `None` for the "not found" sentinel or any
/// other non-numeric text.
pub fn parse_score(score: &str) -> Option<f64> {
    parse_rating(score)
}

/// One product listing scraped from a store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WineListing {
    pub name: String,

    #[serde(default)]
    pub price: String,

    #[serde(default = "default_link")]
    pub url: String,

    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Rating as text, `"N/A"` until resolved
    #[serde(default = "default_score")]
    pub vivino_score: String,

    #[serde(rename = "type", default)]
    pub wine_type: WineType,

    #[serde(default)]
    pub size: BottleSize,

    #[serde(default)]
    pub store: String,
}

impl WineListing {
    /// Create a listing, classifying type and size from the name
    pub fn new(name: impl Into<String>, store: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            wine_type: WineType::from_name(&name),
            size: BottleSize::from_name(&name),
            name,
            price: String::new(),
            url: default_link(),
            image_url: default_image_url(),
            vivino_score: default_score(),
            store: store.into(),
        }
    }

    /// Numeric score, if one has been resolved
    pub fn score_value(&self) -> Option<f64> {
        parse_score(&self.vivino_score)
    }

    pub fn has_score(&self) -> bool {
        self.score_value().is_some()
    }
}
