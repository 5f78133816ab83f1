use serde::Serialize;

use crate::core::{Candidate, Match};
use crate::normalize::extract_year;
use crate::ranking::sequence_matcher::similarity;

/// Only the first results of a source are examined
pub const LOOKAHEAD: usize = 5;

/// Subtracted from the ratio when query and candidate vintages differ
pub const YEAR_PENALTY: f64 = 0.1;

/// A best ratio must be strictly above this to be accepted
pub const ACCEPT_THRESHOLD: f64 = 0.4;

/// Why a candidate was not scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoRating,
    TooFewRatings,
}

/// What the ranker made of one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Skipped {
        index: usize,
        name: String,
        reason: SkipReason,
    },
    Scored {
        index: usize,
        name: String,
        rating: f64,
        rating_count: u32,
        ratio: f64,
        adjusted_ratio: f64,
        year_mismatch: bool,
    },
}

/// Score the first [`LOOKAHEAD`] candidates against a cleaned query.
///
/// Candidates without a usable rating or with too few ratings are skipped, not
/// scored at zero.
pub fn evaluate(cleaned_query: &str, target_year: Option<u16>, candidates: &[Candidate]) -> Vec<Evaluation> {
    candidates
        .iter()
        .take(LOOKAHEAD)
        .enumerate()
        .map(|(index, candidate)| {
            let rating = match candidate.usable_rating() {
                Some(rating) => rating,
                None => {
                    return Evaluation::Skipped {
                        index,
                        name: candidate.name.clone(),
                        reason: SkipReason::NoRating,
                    }
                }
            };
            if !candidate.is_eligible() {
                return Evaluation::Skipped {
                    index,
                    name: candidate.name.clone(),
                    reason: SkipReason::TooFewRatings,
                };
            }

            let ratio = similarity(cleaned_query, &candidate.name);
            let year_mismatch = matches!(
                (target_year, extract_year(&candidate.name)),
                (Some(target), Some(found)) if target != found
            );
            let adjusted_ratio = if year_mismatch { ratio - YEAR_PENALTY } else { ratio };

            Evaluation::Scored {
                index,
                name: candidate.name.clone(),
                rating,
                rating_count: candidate.rating_count,
                ratio,
                adjusted_ratio,
                year_mismatch,
            }
        })
        .collect()
}

/// Pick the best-matching candidate, if any clears [`ACCEPT_THRESHOLD`].
///
/// A vintage mismatch both lowers the ratio and disqualifies the candidate, so
/// the penalty never changes which candidate wins. Kept that way on purpose:
/// stored scores were produced with this rule. Ties keep the earlier candidate.
pub fn rank(cleaned_query: &str, target_year: Option<u16>, candidates: &[Candidate]) -> Option<Match> {
    let mut best: Option<(usize, f64, f64)> = None;
    let mut highest = 0.0;

    for evaluation in evaluate(cleaned_query, target_year, candidates) {
        match evaluation {
            Evaluation::Skipped { index, name, reason } => {
                tracing::debug!("  Result {}: {} - skipped ({:?})", index + 1, name, reason);
            }
            Evaluation::Scored {
                index,
                name,
                rating,
                rating_count,
                ratio,
                adjusted_ratio,
                year_mismatch,
            } => {
                tracing::debug!(
                    "  Result {}: {} | Rating: {} ({} ratings) | Match: {:.2}{}",
                    index + 1,
                    name,
                    rating,
                    rating_count,
                    adjusted_ratio,
                    if year_mismatch { " (vintage mismatch)" } else { "" }
                );
                if adjusted_ratio > highest && !year_mismatch {
                    highest = adjusted_ratio;
                    best = Some((index, ratio, adjusted_ratio));
                }
            }
        }
    }

    match best {
        Some((index, ratio, adjusted_ratio)) if highest > ACCEPT_THRESHOLD => {
            let candidate = candidates[index].clone();
            let rating = candidate.usable_rating()?;
            Some(Match {
                candidate,
                ratio,
                adjusted_ratio,
                rating,
            })
        }
        _ => {
            tracing::debug!("  No good match found (best ratio: {:.2})", highest);
            None
        }
    }
}
