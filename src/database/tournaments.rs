use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Tournament, TournamentId, TournamentStatus};

pub fn upsert_tournament(conn: &Connection, tournament: &Tournament) -> Result<()> {
    let sql = "INSERT INTO tournaments (id, name, capacity, status, created_at) \
               VALUES (?1, ?2, ?3, ?4, ?5) \
               ON CONFLICT(id) DO UPDATE SET \
               name = excluded.name, capacity = excluded.capacity, status = excluded.status";

    conn.execute(
        sql,
        params![
            tournament.id,
            tournament.name,
            tournament.capacity as i64,
            tournament.status.as_str(),
            tournament.created_at.to_rfc3339(),
        ],
    )
    .context("Failed to upsert tournament")
    .map(|_| ())
}

pub fn update_status(conn: &Connection, id: TournamentId, status: TournamentStatus) -> Result<()> {
    conn.execute(
        "UPDATE tournaments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )
    .context("Failed to update tournament status")
    .map(|_| ())
}

pub fn update_field_size(conn: &Connection, id: TournamentId, field_size: usize) -> Result<()> {
    conn.execute(
        "UPDATE tournaments SET field_size = ?1 WHERE id = ?2",
        params![field_size as i64, id],
    )
    .context("Failed to update tournament field size")
    .map(|_| ())
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = "SELECT id, name, capacity, status, created_at FROM tournaments WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, capacity, status, created_at FROM tournaments ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn field_size(conn: &Connection, id: TournamentId) -> Result<Option<usize>> {
    let stored: Option<Option<i64>> = conn
        .query_row(
            "SELECT field_size FROM tournaments WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query tournament field size")?;

    Ok(stored.flatten().map(|s| s as usize))
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    let status: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get::<_, i64>(2)? as usize,
        status: TournamentStatus::parse(&status).unwrap_or(TournamentStatus::RegistrationOpen),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
