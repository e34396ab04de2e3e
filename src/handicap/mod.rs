use serde::{Deserialize, Serialize};

use crate::config::HandicapSettings;
use crate::domain::RankTier;
use crate::errors::EngineError;

/// Outcome of a handicap computation. Derived, never persisted.
///
/// `player_race_to`/`opponent_race_to` follow the argument order of
/// `compute_handicap`; the lower-ranked side gets the reduced target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapResult {
    pub valid: bool,
    pub reason: Option<String>,
    pub rank_distance: usize,
    /// Base race target for this stake bracket.
    pub race_to: u32,
    pub player_race_to: u32,
    pub opponent_race_to: u32,
}

impl HandicapResult {
    fn invalid(distance: usize, race_to: u32, reason: String) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            rank_distance: distance,
            race_to,
            player_race_to: race_to,
            opponent_race_to: race_to,
        }
    }
}

/// Compute the race adjustment between two ranked players at a given stake.
///
/// Pure and deterministic: the same (rank, rank, stake) triple always yields
/// the same result. Rank gaps beyond `max_rank_gap` are refused, not
/// clamped; callers must block pairing creation on `valid == false`.
pub fn compute_handicap(
    player_rank: RankTier,
    opponent_rank: RankTier,
    stake: i64,
    settings: &HandicapSettings,
) -> HandicapResult {
    let distance = player_rank.distance(opponent_rank);
    let bracket = settings.bracket_for_stake(stake);

    if distance > settings.max_rank_gap {
        return HandicapResult::invalid(
            distance,
            bracket.race_to,
            format!(
                "rank gap of {} tiers exceeds the allowed maximum of {}",
                distance, settings.max_rank_gap
            ),
        );
    }

    let reduction = race_reduction(distance, bracket.race_to, bracket.reduction_per_tier);
    let reduced = bracket.race_to - reduction;

    let (player_race_to, opponent_race_to) = if player_rank < opponent_rank {
        (reduced, bracket.race_to)
    } else if opponent_rank < player_rank {
        (bracket.race_to, reduced)
    } else {
        (bracket.race_to, bracket.race_to)
    };

    HandicapResult {
        valid: true,
        reason: None,
        rank_distance: distance,
        race_to: bracket.race_to,
        player_race_to,
        opponent_race_to,
    }
}

/// Like [`compute_handicap`], but turns a refusal into a typed error for
/// callers that must block the pairing outright instead of rendering the
/// refusal.
pub fn checked_handicap(
    player_rank: RankTier,
    opponent_rank: RankTier,
    stake: i64,
    settings: &HandicapSettings,
) -> Result<HandicapResult, EngineError> {
    let result = compute_handicap(player_rank, opponent_rank, stake, settings);
    if result.valid {
        Ok(result)
    } else {
        Err(EngineError::InvalidHandicap {
            player: player_rank,
            opponent: opponent_rank,
            reason: result.reason.as_deref().unwrap_or("refused").to_string(),
        })
    }
}

/// Games shaved off the weaker player's target. Monotone in distance, capped
/// so the reduced target never drops below 1.
fn race_reduction(distance: usize, race_to: u32, per_tier: f64) -> u32 {
    if distance == 0 {
        return 0;
    }
    let raw = (distance as f64 * per_tier).ceil() as u32;
    raw.min(race_to - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> HandicapSettings {
        HandicapSettings::default()
    }

    #[test]
    fn test_equal_ranks_no_handicap() {
        let result = compute_handicap(RankTier::H, RankTier::H, 500, &settings());
        assert!(result.valid);
        assert_eq!(result.rank_distance, 0);
        assert_eq!(result.player_race_to, result.opponent_race_to);
        assert_eq!(result.player_race_to, result.race_to);
    }

    #[test]
    fn test_k_vs_g_at_mid_stake_is_valid_and_non_zero() {
        let result = compute_handicap(RankTier::K, RankTier::G, 500, &settings());
        assert!(result.valid);
        assert_eq!(result.rank_distance, 6);
        // The K player races to fewer games than the G player.
        assert!(result.player_race_to < result.opponent_race_to);
        assert_eq!(result.opponent_race_to, result.race_to);
    }

    #[test]
    fn test_k_vs_e_plus_is_refused() {
        let result = compute_handicap(RankTier::K, RankTier::EPlus, 500, &settings());
        assert!(!result.valid);
        assert_eq!(result.rank_distance, 11);
        assert!(result.reason.as_deref().unwrap_or("").contains("11"));
    }

    #[test]
    fn test_mirror_symmetry() {
        for stake in [0, 300, 500, 1000, 2500] {
            let forward = compute_handicap(RankTier::KPlus, RankTier::HPlus, stake, &settings());
            let reverse = compute_handicap(RankTier::HPlus, RankTier::KPlus, stake, &settings());
            assert_eq!(forward.valid, reverse.valid);
            assert_eq!(forward.rank_distance, reverse.rank_distance);
            assert_eq!(forward.player_race_to, reverse.opponent_race_to);
            assert_eq!(forward.opponent_race_to, reverse.player_race_to);
        }
    }

    #[test]
    fn test_reduction_monotone_in_distance() {
        let s = settings();
        let mut previous = u32::MAX;
        for opponent in [
            RankTier::K,
            RankTier::KPlus,
            RankTier::I,
            RankTier::IPlus,
            RankTier::H,
        ] {
            // K challenges progressively stronger opponents.
            let result = compute_handicap(RankTier::K, opponent, 1000, &s);
            assert!(result.valid);
            assert!(result.player_race_to <= previous);
            previous = result.player_race_to;
        }
    }

    #[test]
    fn test_reduction_scales_with_stake() {
        let s = settings();
        let small = compute_handicap(RankTier::K, RankTier::H, 100, &s);
        let large = compute_handicap(RankTier::K, RankTier::H, 1000, &s);
        let small_gap = small.opponent_race_to - small.player_race_to;
        let large_gap = large.opponent_race_to - large.player_race_to;
        assert!(large_gap >= small_gap);
        assert!(large.race_to > small.race_to);
    }

    #[test]
    fn test_reduced_target_never_below_one() {
        let s = settings();
        let result = compute_handicap(RankTier::K, RankTier::GPlus, 0, &s);
        assert!(result.valid);
        assert!(result.player_race_to >= 1);
    }

    #[test]
    fn test_checked_handicap_refusal_is_typed() {
        let s = settings();
        let err = checked_handicap(RankTier::K, RankTier::EPlus, 500, &s).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidHandicap { player: RankTier::K, opponent: RankTier::EPlus, .. }
        ));
        assert!(checked_handicap(RankTier::K, RankTier::G, 500, &s).is_ok());
    }

    #[test]
    fn test_determinism() {
        let s = settings();
        let a = compute_handicap(RankTier::I, RankTier::F, 600, &s);
        let b = compute_handicap(RankTier::I, RankTier::F, 600, &s);
        assert_eq!(a, b);
    }
}
