use thiserror::Error;

use crate::bracket::SlotId;
use crate::domain::RankTier;

/// Errors produced by the rules core.
///
/// The core never logs, retries or swallows; callers decide how to surface
/// these. Service and database layers wrap their own failures in
/// `anyhow::Error` instead.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("cannot build a bracket for {0} participants (supported: 4..=64)")]
    UnsupportedSize(usize),

    #[error("slot {0} does not exist in this bracket")]
    SlotNotFound(SlotId),

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("invalid result: {0}")]
    InvalidResult(String),

    #[error("handicap not allowed between {player} and {opponent}: {reason}")]
    InvalidHandicap {
        player: RankTier,
        opponent: RankTier,
        reason: String,
    },

    #[error("unknown tournament {0}")]
    UnknownTournament(i64),
}
