//! SQLite connection pools.
//!
//! Every connection runs with foreign keys on, so deleting an author,
//! publisher or book cascades to its books, polls and tag links. Opening a
//! pool brings the schema up to date and refuses a database written by a
//! newer build.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use shelf_core::config::DatabaseConfig;
use shelf_core::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const MEMORY_POOL_SIZE: u32 = 4;

/// Open the on-disk catalog described by `config`.
///
/// The file is created if missing. Connections use WAL journaling and wait
/// up to `busy_timeout_ms` on a database locked by another writer.
pub fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    if config.pool_size == 0 {
        return Err(Error::validation("database.pool_size must be at least 1"));
    }

    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )
    });

    tracing::debug!(
        path = %config.path.display(),
        pool_size = config.pool_size,
        "opening database"
    );
    open(manager, config.pool_size)
}

/// Initialize an in-memory database pool (useful for tests).
///
/// Each call creates a uniquely-named shared-cache in-memory database so
/// that parallel tests do not interfere with each other, while all
/// connections *within* a single pool still share state.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:shelf_memdb_{}_{n}?mode=memory&cache=shared", std::process::id());

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    open(manager, MEMORY_POOL_SIZE)
}

/// Build the pool and migrate. A schema newer than [`migrations::latest_version`]
/// is rejected before anything is written.
fn open(manager: SqliteConnectionManager, size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    let found = migrations::current_version(&conn)?;
    let latest = migrations::latest_version();
    if found > latest {
        return Err(Error::validation(format!(
            "database schema is at version {found}, but this build only knows up to {latest}"
        )));
    }

    migrations::run_migrations(&conn)?;
    tracing::debug!(from = found, to = latest, "database ready");

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
