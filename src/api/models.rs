use serde::{Deserialize, Serialize};

use crate::bracket::{MatchSlot, Occupant};
use crate::database::models::{encode_segment, encode_status};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListItem {
    pub player_id: i64,
    pub name: String,
    pub rating: i32,
    pub rank: String,
    pub spa_points: i32,
    pub matches_played: i32,
    pub tournaments_played: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: PlayerListItem,
    pub elo_history: Vec<EloHistoryItem>,
    pub spa_history: Vec<SpaHistoryItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EloHistoryItem {
    pub delta: i32,
    pub source: String,
    pub tournament_id: Option<i64>,
    pub rating_after: i32,
    pub recorded_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaHistoryItem {
    pub tournament_id: i64,
    pub tier: String,
    pub category: String,
    pub points: i32,
    pub total_after: i32,
    pub recorded_at: String,
}

/// Flattened slot row for bracket and pending views.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub slot_id: usize,
    pub segment: String,
    pub cycle: u32,
    pub round: u32,
    pub index_in_round: usize,
    pub player_a: Option<i64>,
    pub player_b: Option<i64>,
    pub bye_a: bool,
    pub bye_b: bool,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner: Option<i64>,
    pub status: String,
}

impl SlotView {
    pub fn from_slot(slot: &MatchSlot) -> Self {
        Self {
            slot_id: slot.id,
            segment: encode_segment(slot.round.segment).to_string(),
            cycle: slot.round.cycle,
            round: slot.round.round,
            index_in_round: slot.index_in_round,
            player_a: slot.occupants[0].player(),
            player_b: slot.occupants[1].player(),
            bye_a: slot.occupants[0] == Occupant::Bye,
            bye_b: slot.occupants[1] == Occupant::Bye,
            score_a: slot.result.map(|r| r.score_a),
            score_b: slot.result.map(|r| r.score_b),
            winner: slot.winner.player(),
            status: encode_status(slot.status).to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketView {
    pub tournament_id: i64,
    pub field_size: usize,
    pub complete: bool,
    pub champion: Option<i64>,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub player_id: i64,
    pub name: String,
    pub rating: i32,
    pub rank: String,
    pub spa_points: i32,
    pub eliminated: bool,
    pub placement: Option<usize>,
    pub category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetail {
    pub tournament_id: i64,
    pub name: String,
    pub capacity: usize,
    pub status: String,
    pub standings: Vec<StandingRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub slot: usize,
    pub score_a: i32,
    pub score_b: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultResponse {
    pub slot: usize,
    pub winner: i64,
    pub loser: i64,
    pub loser_eliminated: bool,
    pub newly_ready: Vec<usize>,
    pub reset_activated: bool,
    pub tournament_complete: bool,
    pub champion: Option<i64>,
}
