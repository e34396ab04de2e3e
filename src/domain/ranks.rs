use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Skill tiers used by the club, lowest to highest.
///
/// The ordering is total and the derive gives us ordinal comparisons for
/// free; rating floors live in `config::ranks` so they stay injected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    K,
    KPlus,
    I,
    IPlus,
    H,
    HPlus,
    G,
    GPlus,
    F,
    FPlus,
    E,
    EPlus,
}

impl RankTier {
    pub const ALL: [RankTier; 12] = [
        RankTier::K,
        RankTier::KPlus,
        RankTier::I,
        RankTier::IPlus,
        RankTier::H,
        RankTier::HPlus,
        RankTier::G,
        RankTier::GPlus,
        RankTier::F,
        RankTier::FPlus,
        RankTier::E,
        RankTier::EPlus,
    ];

    /// Position in the tier ordering, 0 for K.
    pub fn ordinal(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Ordinal distance between two tiers.
    pub fn distance(self, other: RankTier) -> usize {
        self.ordinal().abs_diff(other.ordinal())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankTier::K => "K",
            RankTier::KPlus => "K+",
            RankTier::I => "I",
            RankTier::IPlus => "I+",
            RankTier::H => "H",
            RankTier::HPlus => "H+",
            RankTier::G => "G",
            RankTier::GPlus => "G+",
            RankTier::F => "F",
            RankTier::FPlus => "F+",
            RankTier::E => "E",
            RankTier::EPlus => "E+",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankTier::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown rank tier: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RankTier::K < RankTier::KPlus);
        assert!(RankTier::KPlus < RankTier::EPlus);
        assert_eq!(RankTier::K.ordinal(), 0);
        assert_eq!(RankTier::EPlus.ordinal(), 11);
    }

    #[test]
    fn test_tier_distance() {
        assert_eq!(RankTier::K.distance(RankTier::G), 6);
        assert_eq!(RankTier::G.distance(RankTier::K), 6);
        assert_eq!(RankTier::K.distance(RankTier::EPlus), 11);
        assert_eq!(RankTier::H.distance(RankTier::H), 0);
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("K+".parse::<RankTier>().unwrap(), RankTier::KPlus);
        assert_eq!("e+".parse::<RankTier>().unwrap(), RankTier::EPlus);
        assert!("Z".parse::<RankTier>().is_err());
    }
}
