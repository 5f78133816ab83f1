pub mod ranker;
pub mod sequence_matcher;

pub use ranker::{evaluate, rank, Evaluation, SkipReason, ACCEPT_THRESHOLD, LOOKAHEAD, YEAR_PENALTY};
pub use sequence_matcher::{similarity, MatchingBlock, SequenceMatcher};
