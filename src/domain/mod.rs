pub mod models;
pub mod ranks;

pub use models::{
    PlacementCategory, Player, PlayerId, Tournament, TournamentId, TournamentStatus,
};
pub use ranks::RankTier;
