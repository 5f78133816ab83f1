//! Product name cleanup before querying a rating source.
//!
//! Store listings carry packaging noise ("75cl", "Bag in Box", "12,5% alc")
//! that rating sources do not index. [`clean`] strips it; [`extract_year`] pulls
//! the vintage used to veto candidates from other years.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "12,5% alc", "13 % vol. alc."
    static ref ABV: Regex =
        Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s*%\s*(?:vol\.?\s*)?alc\b\.?").unwrap();
    // "75cl", "750 ml", "1.5L", "3 L"
    static ref VOLUME: Regex = Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s*(?:cl|ml|l)\b").unwrap();
    static ref BAG_IN_BOX: Regex = Regex::new(r"(?i)\bbag[\s-]*in[\s-]*box\b|\bbib\b").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(?:19|20)\d{2}\b").unwrap();
}

/// Strip volume, packaging and ABV tokens, then collapse whitespace
pub fn clean(raw: &str) -> String {
    let name = ABV.replace_all(raw, " ");
    let name = VOLUME.replace_all(&name, " ");
    let name = BAG_IN_BOX.replace_all(&name, " ");

    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First four-digit year starting with 19 or 20, if any
pub fn extract_year(raw: &str) -> Option<u16> {
    YEAR.find(raw).and_then(|m| m.as_str().parse().ok())
}
