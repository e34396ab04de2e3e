use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::RankTier;
use crate::handicap::compute_handicap;

use super::AppState;

/// Handicap preview for a prospective challenge. Pure read, nothing stored.
pub async fn get_handicap(
    State(state): State<Arc<AppState>>,
    Path((rank_a, rank_b, stake)): Path<(String, String, i64)>,
) -> impl IntoResponse {
    let player = match RankTier::from_str(&rank_a) {
        Ok(rank) => rank,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, format!("unknown rank: {}", rank_a))
                .into_response()
        }
    };
    let opponent = match RankTier::from_str(&rank_b) {
        Ok(rank) => rank,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, format!("unknown rank: {}", rank_b))
                .into_response()
        }
    };
    if stake < 0 {
        return (StatusCode::BAD_REQUEST, "stake must be non-negative").into_response();
    }

    Json(compute_handicap(player, opponent, stake, &state.config.handicap)).into_response()
}
