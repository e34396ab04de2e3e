use chrono::Utc;

use crate::config::RewardTable;
use crate::domain::{PlacementCategory, Player, TournamentId};

use super::types::SpaEvent;

/// Award SPA points for a tournament placement.
///
/// A flat lookup on the player's current tier, independent of opponent
/// strength; unmapped tier/category pairs pay zero (never an error).
pub fn apply_tournament_placement(
    player: &mut Player,
    tournament_id: TournamentId,
    category: PlacementCategory,
    rewards: &RewardTable,
) -> SpaEvent {
    let points = rewards.reward_for_placement(player.rank, category);
    player.spa_points += points;
    player.tournaments_played += 1;

    SpaEvent {
        player_id: player.id,
        tournament_id,
        tier: player.rank,
        category,
        points,
        total_after: player.spa_points,
        recorded_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RankTier;

    #[test]
    fn test_placement_award_accumulates() {
        let rewards = RewardTable::standard();
        let mut player = Player::new(7, "An", 1350, RankTier::IPlus);

        let first = apply_tournament_placement(
            &mut player,
            1,
            PlacementCategory::Champion,
            &rewards,
        );
        let second = apply_tournament_placement(
            &mut player,
            2,
            PlacementCategory::Top8,
            &rewards,
        );

        assert!(first.points > second.points);
        assert_eq!(player.spa_points, first.points + second.points);
        assert_eq!(second.total_after, player.spa_points);
        assert_eq!(player.tournaments_played, 2);
    }

    #[test]
    fn test_placement_uses_current_tier() {
        let rewards = RewardTable::standard();
        let mut low = Player::new(1, "Binh", 1000, RankTier::K);
        let mut high = Player::new(2, "Cuong", 2100, RankTier::EPlus);

        let low_event =
            apply_tournament_placement(&mut low, 1, PlacementCategory::Champion, &rewards);
        let high_event =
            apply_tournament_placement(&mut high, 1, PlacementCategory::Champion, &rewards);

        assert!(high_event.points > low_event.points);
        assert_eq!(low_event.tier, RankTier::K);
        assert_eq!(high_event.tier, RankTier::EPlus);
    }
}
