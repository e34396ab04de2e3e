use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

static MEMORY_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    build_pool(SqliteConnectionManager::file(database_path))
}

/// Pool backed by its own shared in-memory database. Used by tests and the
/// simulation command.
pub fn create_memory_pool() -> Result<DbPool> {
    // A plain :memory: manager would give every pooled connection its own
    // empty database; a named shared-cache URI keeps one database per pool.
    let n = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:memdb{}?mode=memory&cache=shared", n);
    build_pool(SqliteConnectionManager::file(uri))
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}
