use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database::{self, SqliteStore};
use crate::services::orchestrator::{LogEventSink, Orchestrator};

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let db_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "pool_club.db".to_string());

        let pool = database::create_pool(&db_path)?;
        let store = SqliteStore::new(pool.clone());
        let orchestrator = Orchestrator::new(store, LogEventSink, self.config.clone());

        rehydrate(&orchestrator, &pool).await?;

        let state = Arc::new(AppState {
            orchestrator,
            pool,
            config: self.config.clone(),
        });

        let app = create_router(state).layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Reinstall every persisted tournament so results can keep flowing after a
/// restart.
async fn rehydrate(
    orchestrator: &Orchestrator<SqliteStore, LogEventSink>,
    pool: &database::DbPool,
) -> Result<()> {
    let mut conn = database::get_connection(pool)?;
    let stored = database::load_all_tournaments(&mut conn)?;
    let count = stored.len();
    for entry in stored {
        orchestrator
            .install(entry.tournament, entry.players, entry.bracket)
            .await;
    }
    info!("Rehydrated {} tournament(s)", count);
    Ok(())
}
