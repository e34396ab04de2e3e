use anyhow::Result;
use log::info;

use crate::config::settings::AppConfig;
use crate::config::RankTable;
use crate::database::{self, players, setup, tournaments, SqliteStore};
use crate::domain::{Player, Tournament};
use crate::services::orchestrator::{LogEventSink, Orchestrator};

/// Plays one full demo tournament against an in-memory database: eight
/// seeded players, double elimination, ratings and rewards applied, final
/// standings logged. Useful as a smoke run after config changes.
pub struct SimulationService {
    config: AppConfig,
}

const DEMO_NAMES: [&str; 8] = [
    "Marek", "Ania", "Piotr", "Kasia", "Tomek", "Ola", "Bartek", "Magda",
];

impl SimulationService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::create_memory_pool()?;
        let mut conn = database::get_connection(&pool)?;
        setup::reset_database(&mut conn)?;

        let tournament = Tournament::new(1, "Club Open (simulated)", DEMO_NAMES.len());
        tournaments::upsert_tournament(&conn, &tournament)?;

        let ranks = RankTable::standard();
        for (i, name) in DEMO_NAMES.iter().enumerate() {
            let rating = 1550 - (i as i32) * 60;
            let player =
                Player::new(i as i64 + 1, *name, rating, ranks.rank_for_rating(rating));
            players::upsert_player(&conn, &player)?;
            players::insert_participant(&conn, tournament.id, player.id, i + 1)?;
        }
        drop(conn);

        let orchestrator = Orchestrator::new(
            SqliteStore::new(pool.clone()),
            LogEventSink,
            self.config.clone(),
        );
        orchestrator.install(tournament, Vec::new(), None).await;
        orchestrator.close_registration(1).await?;

        // Higher-rated player wins every match; scores are stake-free
        // race-to-2 for brevity.
        loop {
            let pending = orchestrator.pending_slots(1).await?;
            if pending.is_empty() {
                break;
            }
            let mut finished = false;
            for slot in pending {
                let a = slot.occupants[0].player().unwrap_or(i64::MAX);
                let b = slot.occupants[1].player().unwrap_or(i64::MAX);
                let (score_a, score_b) = if a < b { (2, 1) } else { (1, 2) };
                let outcome = orchestrator.submit_result(1, slot.id, score_a, score_b).await?;
                if outcome.tournament_complete {
                    finished = true;
                    break;
                }
            }
            if finished {
                break;
            }
        }

        let standings = orchestrator.standings(1).await?;
        info!("--- simulated tournament standings ---");
        for entry in &standings.entries {
            info!(
                "{:>2}. {:<8} rating {:>4} ({}) spa {:>4}{}",
                entry.placement.unwrap_or(0),
                entry.name,
                entry.rating,
                entry.rank,
                entry.spa_points,
                if entry.eliminated { "" } else { "  [champion]" },
            );
        }

        Ok(())
    }
}
