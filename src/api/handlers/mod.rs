pub mod handicap;
pub mod players;
pub mod tournaments;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::settings::AppConfig;
use crate::database::{DbPool, SqliteStore};
use crate::errors::EngineError;
use crate::services::orchestrator::{LogEventSink, Orchestrator};

pub type EngineOrchestrator = Orchestrator<SqliteStore, LogEventSink>;

pub struct AppState {
    pub orchestrator: EngineOrchestrator,
    pub pool: DbPool,
    pub config: AppConfig,
}

/// Map engine rejections to client errors; everything else is a 500.
pub fn error_response(err: anyhow::Error) -> Response {
    let status = match err.downcast_ref::<EngineError>() {
        Some(EngineError::UnknownTournament(_)) | Some(EngineError::SlotNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        Some(EngineError::InvalidStateTransition(_)) => StatusCode::CONFLICT,
        Some(EngineError::InvalidResult(_))
        | Some(EngineError::UnsupportedSize(_))
        | Some(EngineError::InvalidHandicap { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, format!("{err:#}")).into_response()
}
