use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ranks::RankTier;

pub type PlayerId = i64;
pub type TournamentId = i64;

/// Club member taking part in challenges and tournaments.
///
/// `rating` and `rank` stay consistent: the rank is always the highest tier
/// whose floor is <= rating, and only the rating engine mutates either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: i32,
    pub rank: RankTier,
    pub spa_points: i32,
    pub matches_played: i32,
    pub tournaments_played: i32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, rating: i32, rank: RankTier) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            rank,
            spa_points: 0,
            matches_played: 0,
            tournaments_played: 0,
        }
    }
}

/// Tournament lifecycle. Transitions are forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    RegistrationOpen,
    RegistrationClosed,
    Ongoing,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::RegistrationOpen => "registration_open",
            TournamentStatus::RegistrationClosed => "registration_closed",
            TournamentStatus::Ongoing => "ongoing",
            TournamentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registration_open" => Some(TournamentStatus::RegistrationOpen),
            "registration_closed" => Some(TournamentStatus::RegistrationClosed),
            "ongoing" => Some(TournamentStatus::Ongoing),
            "completed" => Some(TournamentStatus::Completed),
            _ => None,
        }
    }
}

/// Tournament header. Reward and capacity configuration are fixed at
/// creation; the bracket is created exactly once, at registration close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub capacity: usize,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(id: TournamentId, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            status: TournamentStatus::RegistrationOpen,
            created_at: Utc::now(),
        }
    }
}

/// Final-standing bands that earn SPA rewards. Anything below top 16 counts
/// as participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementCategory {
    Champion,
    RunnerUp,
    Third,
    Fourth,
    Top8,
    Top16,
    Participation,
}

impl PlacementCategory {
    /// Category for a 1-based final placement.
    pub fn from_placement(placement: usize) -> Self {
        match placement {
            1 => PlacementCategory::Champion,
            2 => PlacementCategory::RunnerUp,
            3 => PlacementCategory::Third,
            4 => PlacementCategory::Fourth,
            5..=8 => PlacementCategory::Top8,
            9..=16 => PlacementCategory::Top16,
            _ => PlacementCategory::Participation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlacementCategory::Champion => "champion",
            PlacementCategory::RunnerUp => "runner_up",
            PlacementCategory::Third => "third",
            PlacementCategory::Fourth => "fourth",
            PlacementCategory::Top8 => "top8",
            PlacementCategory::Top16 => "top16",
            PlacementCategory::Participation => "participation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "champion" => Some(PlacementCategory::Champion),
            "runner_up" => Some(PlacementCategory::RunnerUp),
            "third" => Some(PlacementCategory::Third),
            "fourth" => Some(PlacementCategory::Fourth),
            "top8" => Some(PlacementCategory::Top8),
            "top16" => Some(PlacementCategory::Top16),
            "participation" => Some(PlacementCategory::Participation),
            _ => None,
        }
    }
}
