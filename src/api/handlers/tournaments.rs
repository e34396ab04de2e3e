use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use crate::api::models::{
    BracketView, SlotView, StandingRow, SubmitResultRequest, SubmitResultResponse,
    TournamentDetail,
};

use super::{error_response, AppState};

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let tournament = match state.orchestrator.tournament(id).await {
        Ok(tournament) => tournament,
        Err(e) => return error_response(e),
    };
    let standings = match state.orchestrator.standings(id).await {
        Ok(standings) => standings,
        Err(e) => return error_response(e),
    };

    Json(TournamentDetail {
        tournament_id: tournament.id,
        name: tournament.name,
        capacity: tournament.capacity,
        status: tournament.status.as_str().to_string(),
        standings: standings
            .entries
            .into_iter()
            .map(|entry| StandingRow {
                player_id: entry.player_id,
                name: entry.name,
                rating: entry.rating,
                rank: entry.rank.as_str().to_string(),
                spa_points: entry.spa_points,
                eliminated: entry.eliminated,
                placement: entry.placement,
                category: entry.category.map(|c| c.as_str().to_string()),
            })
            .collect(),
    })
    .into_response()
}

pub async fn get_bracket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.orchestrator.bracket_graph(id).await {
        Ok(bracket) => Json(BracketView {
            tournament_id: id,
            field_size: bracket.field_size,
            complete: bracket.complete,
            champion: bracket.champion,
            slots: bracket.slots.iter().map(SlotView::from_slot).collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_pending_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.orchestrator.pending_slots(id).await {
        Ok(slots) => {
            let views: Vec<SlotView> = slots.iter().map(SlotView::from_slot).collect();
            Json(views).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn post_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<SubmitResultRequest>,
) -> impl IntoResponse {
    match state
        .orchestrator
        .submit_result(id, request.slot, request.score_a, request.score_b)
        .await
    {
        Ok(outcome) => Json(SubmitResultResponse {
            slot: outcome.slot,
            winner: outcome.winner,
            loser: outcome.loser,
            loser_eliminated: outcome.loser_eliminated,
            newly_ready: outcome.newly_ready,
            reset_activated: outcome.reset_activated,
            tournament_complete: outcome.tournament_complete,
            champion: outcome.champion,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
