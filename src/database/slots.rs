use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::bracket::{MatchScore, RoundId};
use crate::domain::TournamentId;

use super::models::{
    decode_occupant, decode_segment, decode_status, encode_occupant, encode_segment,
    encode_status, SlotRow,
};

pub fn upsert_slot(conn: &Connection, tournament_id: TournamentId, row: &SlotRow) -> Result<()> {
    let sql = "INSERT INTO match_slots \
               (tournament_id, slot_id, segment, cycle, round, idx, occupant_a, occupant_b, \
                score_a, score_b, winner, status) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
               ON CONFLICT(tournament_id, slot_id) DO UPDATE SET \
               occupant_a = excluded.occupant_a, occupant_b = excluded.occupant_b, \
               score_a = excluded.score_a, score_b = excluded.score_b, \
               winner = excluded.winner, status = excluded.status";

    conn.execute(
        sql,
        params![
            tournament_id,
            row.slot_id as i64,
            encode_segment(row.round.segment),
            row.round.cycle,
            row.round.round,
            row.index_in_round as i64,
            encode_occupant(row.occupants[0]),
            encode_occupant(row.occupants[1]),
            row.result.map(|r| r.score_a),
            row.result.map(|r| r.score_b),
            encode_occupant(row.winner),
            encode_status(row.status),
        ],
    )
    .context("Failed to upsert match slot")
    .map(|_| ())
}

pub fn list_for_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<SlotRow>> {
    let sql = "SELECT slot_id, segment, cycle, round, idx, occupant_a, occupant_b, \
               score_a, score_b, winner, status \
               FROM match_slots WHERE tournament_id = ?1 ORDER BY slot_id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_slot_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_slot_row(row: &rusqlite::Row) -> rusqlite::Result<SlotRow> {
    let segment: String = row.get(1)?;
    let occupant_a: String = row.get(5)?;
    let occupant_b: String = row.get(6)?;
    let score_a: Option<i32> = row.get(7)?;
    let score_b: Option<i32> = row.get(8)?;
    let winner: String = row.get(9)?;
    let status: String = row.get(10)?;

    Ok(SlotRow {
        slot_id: row.get::<_, i64>(0)? as usize,
        round: RoundId {
            segment: decode_segment(&segment),
            cycle: row.get(2)?,
            round: row.get(3)?,
        },
        index_in_round: row.get::<_, i64>(4)? as usize,
        occupants: [decode_occupant(&occupant_a), decode_occupant(&occupant_b)],
        result: match (score_a, score_b) {
            (Some(a), Some(b)) => Some(MatchScore { score_a: a, score_b: b }),
            _ => None,
        },
        winner: decode_occupant(&winner),
        status: decode_status(&status),
    })
}
