use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{handicap, players, tournaments, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(players::get_players))
        .route("/api/players/:id", get(players::get_player_detail))
        .route("/api/tournaments/:id", get(tournaments::get_tournament))
        .route("/api/tournaments/:id/bracket", get(tournaments::get_bracket))
        .route("/api/tournaments/:id/pending", get(tournaments::get_pending_slots))
        .route("/api/tournaments/:id/results", post(tournaments::post_result))
        .route("/api/handicap/:rank_a/:rank_b/:stake", get(handicap::get_handicap))
        .with_state(state)
}
