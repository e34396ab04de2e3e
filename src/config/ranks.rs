use std::collections::HashMap;

use crate::domain::{PlacementCategory, RankTier};

/// Rating floors per rank tier.
///
/// Floors rise by a constant 100 points per tier, K at 1000. The table is
/// immutable configuration loaded once and passed around explicitly.
#[derive(Debug, Clone)]
pub struct RankTable {
    floors: Vec<(RankTier, i32)>,
}

impl RankTable {
    pub fn standard() -> Self {
        let floors = RankTier::ALL
            .iter()
            .enumerate()
            .map(|(idx, &tier)| (tier, 1000 + (idx as i32) * 100))
            .collect();
        Self { floors }
    }

    pub fn floor(&self, tier: RankTier) -> i32 {
        self.floors
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, floor)| *floor)
            .unwrap_or(0)
    }

    /// Highest tier whose floor is <= rating; below every floor maps to the
    /// lowest tier.
    pub fn rank_for_rating(&self, rating: i32) -> RankTier {
        self.floors
            .iter()
            .rev()
            .find(|(_, floor)| rating >= *floor)
            .map(|(tier, _)| *tier)
            .unwrap_or(RankTier::K)
    }
}

/// SPA points awarded per [rank tier] x [placement category].
///
/// The club publishes this as a flat table with no derivation formula, so it
/// is opaque seeded data here. Lookup misses pay zero rather than failing.
#[derive(Debug, Clone)]
pub struct RewardTable {
    rewards: HashMap<(RankTier, PlacementCategory), i32>,
}

impl RewardTable {
    pub fn standard() -> Self {
        let mut rewards = HashMap::new();

        // Base payouts at K, growing 10% (rounded down) per tier above it.
        let base: [(PlacementCategory, i32); 7] = [
            (PlacementCategory::Champion, 1000),
            (PlacementCategory::RunnerUp, 700),
            (PlacementCategory::Third, 500),
            (PlacementCategory::Fourth, 400),
            (PlacementCategory::Top8, 250),
            (PlacementCategory::Top16, 150),
            (PlacementCategory::Participation, 100),
        ];

        for (idx, &tier) in RankTier::ALL.iter().enumerate() {
            for (category, points) in base {
                let scaled = points + (points / 10) * idx as i32;
                rewards.insert((tier, category), scaled);
            }
        }

        Self { rewards }
    }

    /// Zero on a miss: categories not achieved contribute nothing, and an
    /// unmapped tier/category pair must never invent points.
    pub fn reward_for_placement(&self, tier: RankTier, category: PlacementCategory) -> i32 {
        self.rewards.get(&(tier, category)).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floors_are_constant_gap() {
        let table = RankTable::standard();
        let floors: Vec<i32> = RankTier::ALL.iter().map(|&t| table.floor(t)).collect();
        assert_eq!(floors[0], 1000);
        for pair in floors.windows(2) {
            assert_eq!(pair[1] - pair[0], 100);
        }
    }

    #[test]
    fn test_rank_for_rating_exact_boundaries() {
        let table = RankTable::standard();
        assert_eq!(table.rank_for_rating(999), RankTier::K);
        assert_eq!(table.rank_for_rating(1000), RankTier::K);
        assert_eq!(table.rank_for_rating(1199), RankTier::KPlus);
        assert_eq!(table.rank_for_rating(1200), RankTier::I);
        assert_eq!(table.rank_for_rating(2100), RankTier::EPlus);
        assert_eq!(table.rank_for_rating(9000), RankTier::EPlus);
    }

    #[test]
    fn test_rank_for_rating_matches_floor_of_every_tier() {
        let table = RankTable::standard();
        for &tier in &RankTier::ALL {
            assert_eq!(table.rank_for_rating(table.floor(tier)), tier);
        }
    }

    #[test]
    fn test_rank_for_rating_monotone() {
        let table = RankTable::standard();
        let mut previous = table.rank_for_rating(0);
        for rating in 0..2500 {
            let rank = table.rank_for_rating(rating);
            assert!(rank >= previous);
            previous = rank;
        }
    }

    #[test]
    fn test_rewards_scale_with_tier() {
        let table = RewardTable::standard();
        let k = table.reward_for_placement(RankTier::K, PlacementCategory::Champion);
        let e = table.reward_for_placement(RankTier::EPlus, PlacementCategory::Champion);
        assert_eq!(k, 1000);
        assert!(e > k);
    }

    #[test]
    fn test_reward_ordering_within_tier() {
        let table = RewardTable::standard();
        let champion = table.reward_for_placement(RankTier::H, PlacementCategory::Champion);
        let top8 = table.reward_for_placement(RankTier::H, PlacementCategory::Top8);
        let participation =
            table.reward_for_placement(RankTier::H, PlacementCategory::Participation);
        assert!(champion > top8);
        assert!(top8 > participation);
        assert!(participation > 0);
    }
}
