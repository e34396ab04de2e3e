pub mod elo;
pub mod rewards;
pub mod types;

pub use elo::{apply_decay, apply_match_result, expected_score, match_deltas, MatchRatingOutcome};
pub use rewards::apply_tournament_placement;
pub use types::{EloEvent, RankChange, RatingSource, SpaEvent};
