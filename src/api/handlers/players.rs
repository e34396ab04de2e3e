use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use crate::api::models::{EloHistoryItem, PlayerDetail, PlayerListItem, SpaHistoryItem};
use crate::database::{self, events, players};
use crate::domain::Player;

use super::AppState;

pub async fn get_players(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match players::list_all(&conn) {
        Ok(rows) => {
            let items: Vec<PlayerListItem> = rows.iter().map(list_item).collect();
            Json(items).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
            .into_response(),
    }
}

pub async fn get_player_detail(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> impl IntoResponse {
    let conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let player = match players::find_by_id(&conn, player_id) {
        Ok(Some(player)) => player,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let elo_history = match events::elo_history(&conn, player_id) {
        Ok(history) => history,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };
    let spa_history = match events::spa_history(&conn, player_id) {
        Ok(history) => history,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    Json(PlayerDetail {
        player: list_item(&player),
        elo_history: elo_history
            .iter()
            .map(|e| EloHistoryItem {
                delta: e.delta,
                source: e.source.kind().to_string(),
                tournament_id: match e.source {
                    crate::rating::RatingSource::Match { tournament_id, .. } => tournament_id,
                    crate::rating::RatingSource::Decay => None,
                },
                rating_after: e.rating_after,
                recorded_at: e.recorded_at.to_rfc3339(),
            })
            .collect(),
        spa_history: spa_history
            .iter()
            .map(|e| SpaHistoryItem {
                tournament_id: e.tournament_id,
                tier: e.tier.as_str().to_string(),
                category: e.category.as_str().to_string(),
                points: e.points,
                total_after: e.total_after,
                recorded_at: e.recorded_at.to_rfc3339(),
            })
            .collect(),
    })
    .into_response()
}

fn list_item(player: &Player) -> PlayerListItem {
    PlayerListItem {
        player_id: player.id,
        name: player.name.clone(),
        rating: player.rating,
        rank: player.rank.as_str().to_string(),
        spa_points: player.spa_points,
        matches_played: player.matches_played,
        tournaments_played: player.tournaments_played,
    }
}
