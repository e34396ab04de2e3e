use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::domain::{Player, PlayerId, RankTier};

pub fn upsert_player(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "INSERT INTO players (id, name, rating, rank, spa_points, matches_played, tournaments_played) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
               ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, rating = excluded.rating, rank = excluded.rank, \
               spa_points = excluded.spa_points, matches_played = excluded.matches_played, \
               tournaments_played = excluded.tournaments_played";

    conn.execute(
        sql,
        params![
            player.id,
            player.name,
            player.rating,
            player.rank.as_str(),
            player.spa_points,
            player.matches_played,
            player.tournaments_played,
        ],
    )
    .context("Failed to upsert player")
    .map(|_| ())
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = "SELECT id, name, rating, rank, spa_points, matches_played, tournaments_played \
               FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = "SELECT id, name, rating, rank, spa_points, matches_played, tournaments_played \
               FROM players ORDER BY rating DESC, id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Seed-ordered roster of one tournament.
pub fn roster(conn: &Connection, tournament_id: i64) -> Result<Vec<Player>> {
    let sql = "SELECT p.id, p.name, p.rating, p.rank, p.spa_points, p.matches_played, p.tournaments_played \
               FROM participants t JOIN players p ON p.id = t.player_id \
               WHERE t.tournament_id = ?1 ORDER BY t.seed ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn insert_participant(
    conn: &Connection,
    tournament_id: i64,
    player_id: PlayerId,
    seed: usize,
) -> Result<()> {
    let sql = "INSERT OR REPLACE INTO participants (tournament_id, player_id, seed) VALUES (?1, ?2, ?3)";

    conn.execute(sql, params![tournament_id, player_id, seed as i64])
        .context("Failed to insert participant")
        .map(|_| ())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    let rank: String = row.get(3)?;
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        rank: RankTier::from_str(&rank).unwrap_or(RankTier::K),
        spa_points: row.get(4)?,
        matches_played: row.get(5)?,
        tournaments_played: row.get(6)?,
    })
}
