use super::ranks::{RankTable, RewardTable};

/// ELO update parameters.
///
/// Separate K-factors are representable for asymmetric schemes; the club
/// default is symmetric.
#[derive(Debug, Clone)]
pub struct EloSettings {
    pub k_factor_winner: f64,
    pub k_factor_loser: f64,
    pub starting_rating: i32,
    /// Ratings never drop below this. There is no ceiling.
    pub rating_floor: i32,
    /// Flat deduction applied by inactivity decay.
    pub decay_step: i32,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            k_factor_winner: 32.0,
            k_factor_loser: 32.0,
            starting_rating: 1000,
            rating_floor: 0,
            decay_step: 10,
        }
    }
}

/// One stake bracket: challenges at `min_stake` or above (up to the next
/// bracket) race to `race_to`, and each tier of rank difference shaves
/// `reduction_per_tier` games off the weaker player's target.
#[derive(Debug, Clone)]
pub struct StakeBracket {
    pub min_stake: i64,
    pub race_to: u32,
    pub reduction_per_tier: f64,
}

#[derive(Debug, Clone)]
pub struct HandicapSettings {
    /// Pairings further apart than this many tiers are refused outright.
    pub max_rank_gap: usize,
    /// Sorted ascending by `min_stake`; the last bracket whose floor fits
    /// the stake applies.
    pub stake_brackets: Vec<StakeBracket>,
}

impl Default for HandicapSettings {
    fn default() -> Self {
        Self {
            max_rank_gap: 8,
            stake_brackets: vec![
                StakeBracket { min_stake: 0, race_to: 5, reduction_per_tier: 0.25 },
                StakeBracket { min_stake: 300, race_to: 7, reduction_per_tier: 0.5 },
                StakeBracket { min_stake: 600, race_to: 9, reduction_per_tier: 0.5 },
                StakeBracket { min_stake: 1000, race_to: 11, reduction_per_tier: 0.75 },
            ],
        }
    }
}

impl HandicapSettings {
    pub fn bracket_for_stake(&self, stake: i64) -> &StakeBracket {
        self.stake_brackets
            .iter()
            .rev()
            .find(|b| stake >= b.min_stake)
            .unwrap_or(&self.stake_brackets[0])
    }
}

/// Top-level configuration, passed explicitly (dependency injection) rather
/// than through globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub elo: EloSettings,
    pub handicap: HandicapSettings,
    pub ranks: RankTable,
    pub rewards: RewardTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            elo: EloSettings::default(),
            handicap: HandicapSettings::default(),
            ranks: RankTable::standard(),
            rewards: RewardTable::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_bracket_selection() {
        let settings = HandicapSettings::default();
        assert_eq!(settings.bracket_for_stake(0).race_to, 5);
        assert_eq!(settings.bracket_for_stake(250).race_to, 5);
        assert_eq!(settings.bracket_for_stake(500).race_to, 7);
        assert_eq!(settings.bracket_for_stake(5000).race_to, 11);
    }
}
