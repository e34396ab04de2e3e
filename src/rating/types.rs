use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PlacementCategory, PlayerId, RankTier, TournamentId};

/// Where a rating delta came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingSource {
    /// A completed match, identified by tournament and slot where known.
    Match {
        tournament_id: Option<TournamentId>,
        slot: Option<usize>,
    },
    /// Inactivity decay.
    Decay,
}

impl RatingSource {
    pub fn kind(&self) -> &'static str {
        match self {
            RatingSource::Match { .. } => "match",
            RatingSource::Decay => "decay",
        }
    }
}

/// Append-only ELO history entry.
///
/// Audit invariant: a player's rating is always the starting rating plus the
/// sum of their event deltas, and `rating_after` records the running total at
/// the time the event landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloEvent {
    pub player_id: PlayerId,
    pub delta: i32,
    pub source: RatingSource,
    pub rating_after: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only SPA history entry. SPA points are a reward currency separate
/// from ELO, awarded on tournament placement; they only ever accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaEvent {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub tier: RankTier,
    pub category: PlacementCategory,
    pub points: i32,
    pub total_after: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Emitted when an event pushes a player across a tier floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub player_id: PlayerId,
    pub from: RankTier,
    pub to: RankTier,
}
