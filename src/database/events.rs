use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::str::FromStr;

use crate::domain::{PlacementCategory, PlayerId, RankTier};
use crate::rating::{EloEvent, RatingSource, SpaEvent};

pub fn insert_elo_event(conn: &Connection, event: &EloEvent) -> Result<()> {
    let (tournament_id, slot_id) = match event.source {
        RatingSource::Match { tournament_id, slot } => (tournament_id, slot.map(|s| s as i64)),
        RatingSource::Decay => (None, None),
    };

    let sql = "INSERT INTO elo_events \
               (player_id, delta, source_kind, tournament_id, slot_id, rating_after, recorded_at) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    conn.execute(
        sql,
        params![
            event.player_id,
            event.delta,
            event.source.kind(),
            tournament_id,
            slot_id,
            event.rating_after,
            event.recorded_at.to_rfc3339(),
        ],
    )
    .context("Failed to insert elo event")
    .map(|_| ())
}

pub fn insert_spa_event(conn: &Connection, event: &SpaEvent) -> Result<()> {
    let sql = "INSERT INTO spa_events \
               (player_id, tournament_id, tier, category, points, total_after, recorded_at) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    conn.execute(
        sql,
        params![
            event.player_id,
            event.tournament_id,
            event.tier.as_str(),
            event.category.as_str(),
            event.points,
            event.total_after,
            event.recorded_at.to_rfc3339(),
        ],
    )
    .context("Failed to insert spa event")
    .map(|_| ())
}

/// A player's ELO history, oldest first.
pub fn elo_history(conn: &Connection, player_id: PlayerId) -> Result<Vec<EloEvent>> {
    let sql = "SELECT player_id, delta, source_kind, tournament_id, slot_id, rating_after, recorded_at \
               FROM elo_events WHERE player_id = ?1 ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_elo_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn spa_history(conn: &Connection, player_id: PlayerId) -> Result<Vec<SpaEvent>> {
    let sql = "SELECT player_id, tournament_id, tier, category, points, total_after, recorded_at \
               FROM spa_events WHERE player_id = ?1 ORDER BY id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_spa_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_elo_row(row: &rusqlite::Row) -> rusqlite::Result<EloEvent> {
    let kind: String = row.get(2)?;
    let tournament_id: Option<i64> = row.get(3)?;
    let slot_id: Option<i64> = row.get(4)?;
    let recorded_at: String = row.get(6)?;

    let source = match kind.as_str() {
        "decay" => RatingSource::Decay,
        _ => RatingSource::Match {
            tournament_id,
            slot: slot_id.map(|s| s as usize),
        },
    };

    Ok(EloEvent {
        player_id: row.get(0)?,
        delta: row.get(1)?,
        source,
        rating_after: row.get(5)?,
        recorded_at: parse_timestamp(&recorded_at),
    })
}

fn parse_spa_row(row: &rusqlite::Row) -> rusqlite::Result<SpaEvent> {
    let tier: String = row.get(2)?;
    let category: String = row.get(3)?;
    let recorded_at: String = row.get(6)?;

    Ok(SpaEvent {
        player_id: row.get(0)?,
        tournament_id: row.get(1)?,
        tier: RankTier::from_str(&tier).unwrap_or(RankTier::K),
        category: PlacementCategory::parse(&category)
            .unwrap_or(PlacementCategory::Participation),
        points: row.get(4)?,
        total_after: row.get(5)?,
        recorded_at: parse_timestamp(&recorded_at),
    })
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
