pub mod candidate;
pub mod resolution;
pub mod wine;

pub use candidate::{Candidate, Match, MIN_RATING_COUNT};
pub use resolution::{format_rating, Resolution, NOT_FOUND};
pub use wine::{parse_score, BottleSize, WineListing, WineType};
