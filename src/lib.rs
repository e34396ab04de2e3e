pub mod api;
pub mod bracket;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod handicap;
pub mod rating;
pub mod services;

use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::RankTier;
use crate::services::server::ServerService;
use crate::services::simulation::SimulationService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup() -> Result<()> {
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "pool_club.db".to_string());
    let pool = database::create_pool(&db_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::reset_database(&mut conn)
}

pub fn handle_simulate() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = SimulationService::new(AppConfig::new());
        service.run().await
    })
}

pub fn handle_handicap(rank_a: &str, rank_b: &str, stake: i64) -> Result<()> {
    let player =
        RankTier::from_str(rank_a).map_err(|_| anyhow!("unknown rank: {}", rank_a))?;
    let opponent =
        RankTier::from_str(rank_b).map_err(|_| anyhow!("unknown rank: {}", rank_b))?;

    let config = AppConfig::new();
    let result = handicap::checked_handicap(player, opponent, stake, &config.handicap)?;

    println!(
        "{} races to {}, {} races to {} (base race-to-{}, gap {} tiers)",
        player,
        result.player_race_to,
        opponent,
        result.opponent_race_to,
        result.race_to,
        result.rank_distance,
    );
    Ok(())
}
