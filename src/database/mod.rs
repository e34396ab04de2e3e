pub mod connection;
pub mod events;
pub mod models;
pub mod players;
pub mod setup;
pub mod slots;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::SlotRow;

use anyhow::{Context, Result};

use crate::bracket::{self, Bracket, MatchSlot, Occupant, SlotStatus};
use crate::domain::{Player, Tournament, TournamentId};
use crate::services::orchestrator::{ResultSink, RosterSource, TournamentTransaction};

/// SQLite-backed store behind the orchestrator's collaborator traits.
///
/// `persist` writes the whole transaction inside a single SQLite
/// transaction, so a refused write leaves the database untouched and the
/// orchestrator free to roll back its in-memory state.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl RosterSource for SqliteStore {
    async fn confirmed_participants(&self, tournament_id: TournamentId) -> Result<Vec<Player>> {
        let conn = get_connection(&self.pool)?;
        players::roster(&conn, tournament_id)
    }
}

impl ResultSink for SqliteStore {
    async fn persist(&self, transaction: &TournamentTransaction) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn
            .transaction()
            .context("Failed to open a database transaction")?;

        let id = transaction.tournament_id;
        if let Some(status) = transaction.status {
            tournaments::update_status(&tx, id, status)?;
        }
        if let Some(field_size) = transaction.field_size {
            tournaments::update_field_size(&tx, id, field_size)?;
        }
        for &(player_id, seed) in &transaction.participants {
            players::insert_participant(&tx, id, player_id, seed)?;
        }
        for slot in &transaction.slots {
            slots::upsert_slot(&tx, id, &slot_row(slot))?;
        }
        for player in &transaction.players {
            players::upsert_player(&tx, player)?;
        }
        for event in &transaction.elo_events {
            events::insert_elo_event(&tx, event)?;
        }
        for event in &transaction.spa_events {
            events::insert_spa_event(&tx, event)?;
        }

        tx.commit().context("Failed to commit the transaction")
    }
}

fn slot_row(slot: &MatchSlot) -> SlotRow {
    SlotRow {
        slot_id: slot.id,
        round: slot.round,
        index_in_round: slot.index_in_round,
        occupants: slot.occupants,
        result: slot.result,
        winner: slot.winner,
        status: slot.status,
    }
}

/// Everything needed to reinstall one persisted tournament in the
/// orchestrator.
pub struct StoredTournament {
    pub tournament: Tournament,
    pub players: Vec<Player>,
    pub bracket: Option<Bracket>,
}

/// Load every persisted tournament for rehydration at startup.
pub fn load_all_tournaments(conn: &mut DbConn) -> Result<Vec<StoredTournament>> {
    let mut stored = Vec::new();
    for tournament in tournaments::list_all(conn)? {
        stored.push(load_tournament(conn, tournament)?);
    }
    Ok(stored)
}

fn load_tournament(conn: &mut DbConn, tournament: Tournament) -> Result<StoredTournament> {
    let roster = players::roster(conn, tournament.id)?;
    let bracket = match tournaments::field_size(conn, tournament.id)? {
        Some(_) => Some(rebuild_bracket(conn, tournament.id, &roster)?),
        None => None,
    };
    Ok(StoredTournament { tournament, players: roster, bracket })
}

/// Rebuild a bracket from its stored slot rows.
///
/// The graph itself is deterministic for a given seed-ordered roster, so it
/// is rebuilt from scratch and the mutable slot state (occupants, results,
/// statuses) is overlaid from the rows. Eliminations and the champion are
/// then re-derived from the completed slots.
fn rebuild_bracket(
    conn: &mut DbConn,
    tournament_id: TournamentId,
    roster: &[Player],
) -> Result<Bracket> {
    let participant_ids: Vec<_> = roster.iter().map(|p| p.id).collect();
    let mut bracket = bracket::build_double_elimination(&participant_ids)
        .context("stored roster no longer builds a bracket")?;

    for row in slots::list_for_tournament(conn, tournament_id)? {
        let slot = bracket
            .slots
            .get_mut(row.slot_id)
            .with_context(|| format!("stored slot {} is out of range", row.slot_id))?;
        slot.occupants = row.occupants;
        slot.result = row.result;
        slot.winner = row.winner;
        slot.status = row.status;
    }

    derive_progress(&mut bracket);
    Ok(bracket)
}

fn derive_progress(bracket: &mut Bracket) {
    // Losers-side knockouts: completed slots with no loser edge. The final
    // segment is excluded here because the first grand final eliminates its
    // loser only when no reset follows.
    let mut eliminations: Vec<_> = bracket
        .slots
        .iter()
        .filter(|slot| {
            slot.status == SlotStatus::Completed
                && slot.loser_to.is_none()
                && slot.id != bracket.grand_final
                && slot.id != bracket.reset
        })
        .filter_map(|slot| match slot.loser() {
            Occupant::Player(player) => {
                Some(bracket::Elimination { player, slot: slot.id })
            }
            _ => None,
        })
        .collect();

    let decider = if bracket.slots[bracket.reset].status == SlotStatus::Completed {
        Some(bracket.reset)
    } else if bracket.slots[bracket.grand_final].status == SlotStatus::Completed
        && bracket.slots[bracket.reset].status == SlotStatus::Voided
    {
        Some(bracket.grand_final)
    } else {
        None
    };

    if let Some(decider) = decider {
        let slot = &bracket.slots[decider];
        if let Occupant::Player(player) = slot.loser() {
            eliminations.push(bracket::Elimination { player, slot: decider });
        }
        bracket.champion = slot.winner.player();
        bracket.complete = bracket.champion.is_some();
    }

    bracket.eliminations = eliminations;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankTable;
    use crate::domain::RankTier;

    fn memory_store() -> SqliteStore {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::reset_database(&mut conn).unwrap();
        SqliteStore::new(pool)
    }

    fn seed_roster(store: &SqliteStore, tournament_id: i64, n: usize) {
        let ranks = RankTable::standard();
        let conn = get_connection(store.pool()).unwrap();
        tournaments::upsert_tournament(
            &conn,
            &Tournament::new(tournament_id, "Club Open", n),
        )
        .unwrap();
        for id in 1..=n as i64 {
            let rating = 1000 + (id as i32) * 50;
            let player = Player::new(
                id,
                format!("player-{}", id),
                rating,
                ranks.rank_for_rating(rating),
            );
            players::upsert_player(&conn, &player).unwrap();
            players::insert_participant(&conn, tournament_id, id, id as usize).unwrap();
        }
    }

    #[tokio::test]
    async fn test_roster_comes_back_seed_ordered() {
        let store = memory_store();
        seed_roster(&store, 1, 8);

        let roster = store.confirmed_participants(1).await.unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        // Seed 8 carries rating 1400, the H floor.
        assert_eq!(roster[7].rank, RankTier::H);
    }

    #[tokio::test]
    async fn test_persist_and_rebuild_round_trips() {
        let store = memory_store();
        seed_roster(&store, 1, 8);

        let roster = store.confirmed_participants(1).await.unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        let mut bracket = bracket::build_double_elimination(&ids).unwrap();

        let first = bracket.pending_slots()[0].id;
        bracket::submit_result(&mut bracket, first, 5, 3).unwrap();

        store
            .persist(&TournamentTransaction {
                tournament_id: 1,
                field_size: Some(bracket.field_size),
                slots: bracket.slots.clone(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut conn = get_connection(store.pool()).unwrap();
        let rebuilt = rebuild_bracket(&mut conn, 1, &roster).unwrap();
        assert_eq!(
            serde_json::to_string(&rebuilt).unwrap(),
            serde_json::to_string(&bracket).unwrap()
        );
    }

    #[tokio::test]
    async fn test_rebuild_derives_champion_and_eliminations() {
        let store = memory_store();
        seed_roster(&store, 1, 4);

        let roster = store.confirmed_participants(1).await.unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        let mut bracket = bracket::build_double_elimination(&ids).unwrap();
        while !bracket.complete {
            let slot = bracket.pending_slots()[0].id;
            bracket::submit_result(&mut bracket, slot, 2, 0).unwrap();
        }

        store
            .persist(&TournamentTransaction {
                tournament_id: 1,
                field_size: Some(bracket.field_size),
                slots: bracket.slots.clone(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut conn = get_connection(store.pool()).unwrap();
        let rebuilt = rebuild_bracket(&mut conn, 1, &roster).unwrap();
        assert!(rebuilt.complete);
        assert_eq!(rebuilt.champion, bracket.champion);
        assert_eq!(rebuilt.eliminations.len(), 3);
    }

    fn decide(bracket: &mut Bracket, round: crate::bracket::RoundId, winner: i64) {
        let (id, a_wins) = {
            let slot = bracket
                .slots
                .iter()
                .find(|s| s.round == round && s.status == SlotStatus::Ready)
                .unwrap();
            (slot.id, slot.occupants[0] == Occupant::Player(winner))
        };
        let (a, b) = if a_wins { (2, 1) } else { (1, 2) };
        bracket::submit_result(bracket, id, a, b).unwrap();
    }

    #[tokio::test]
    async fn test_rebuild_after_grand_final_reset() {
        let store = memory_store();
        seed_roster(&store, 1, 4);

        let roster = store.confirmed_participants(1).await.unwrap();
        let ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        let mut bracket = bracket::build_double_elimination(&ids).unwrap();

        // Player 2 falls to the losers side, reaches the grand final, and
        // wins both the first final and the reset.
        use crate::bracket::RoundId;
        decide(&mut bracket, RoundId::winners(1), 1);
        decide(&mut bracket, RoundId::winners(1), 2);
        decide(&mut bracket, RoundId::winners(2), 1);
        decide(&mut bracket, RoundId::losers(1, 1), 3);
        decide(&mut bracket, RoundId::losers(1, 2), 2);
        decide(&mut bracket, RoundId::grand_final(1), 2);
        decide(&mut bracket, RoundId::grand_final(2), 2);
        assert!(bracket.complete);

        store
            .persist(&TournamentTransaction {
                tournament_id: 1,
                field_size: Some(bracket.field_size),
                slots: bracket.slots.clone(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut conn = get_connection(store.pool()).unwrap();
        let rebuilt = rebuild_bracket(&mut conn, 1, &roster).unwrap();

        // The double-loser of the final goes out exactly once, and the
        // champion is never listed as eliminated.
        let mut out: Vec<_> = rebuilt.eliminations.iter().map(|e| e.player).collect();
        out.sort_unstable();
        assert_eq!(out, vec![1, 3, 4]);
        assert_eq!(rebuilt.champion, Some(2));
        assert_eq!(
            serde_json::to_string(&rebuilt).unwrap(),
            serde_json::to_string(&bracket).unwrap()
        );
    }

    #[tokio::test]
    async fn test_elo_events_survive_the_transaction() {
        let store = memory_store();
        seed_roster(&store, 1, 4);

        let event = crate::rating::EloEvent {
            player_id: 1,
            delta: 16,
            source: crate::rating::RatingSource::Match { tournament_id: Some(1), slot: Some(0) },
            rating_after: 1066,
            recorded_at: chrono::Utc::now(),
        };
        store
            .persist(&TournamentTransaction {
                tournament_id: 1,
                elo_events: vec![event],
                ..Default::default()
            })
            .await
            .unwrap();

        let conn = get_connection(store.pool()).unwrap();
        let history = events::elo_history(&conn, 1).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].delta, 16);
        assert_eq!(history[0].rating_after, 1066);
    }
}
