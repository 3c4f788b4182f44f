use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::error::DbError;

/// Open (creating if needed) the SQLite file named by `cfg`.
///
/// The pool holds a single connection: the pipeline writes from one place and
/// SQLite serializes writers anyway. A store locked by another process fails
/// after `busy_timeout_ms`.
pub async fn make_pool(cfg: &DatabaseConfig) -> Result<SqlitePool, DbError> {
    let timeout = Duration::from_millis(cfg.busy_timeout_ms);
    let opts = SqliteConnectOptions::new()
        .filename(&cfg.path)
        .create_if_missing(true)
        .busy_timeout(timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(timeout)
        .connect_with(opts)
        .await?;
    log::info!(
        "Opened SQLite store {} (busy timeout {} ms)",
        cfg.path.display(),
        cfg.busy_timeout_ms
    );
    Ok(pool)
}
