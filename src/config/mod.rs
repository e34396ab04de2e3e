pub mod ranks;
pub mod settings;

pub use ranks::{RankTable, RewardTable};
pub use settings::{AppConfig, EloSettings, HandicapSettings, StakeBracket};
