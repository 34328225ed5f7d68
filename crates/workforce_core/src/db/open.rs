//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have `foreign_keys` set exactly as configured.
//! - Bootstrap failures are logged once and returned, never swallowed.

use super::{DbConfig, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file configured for the employee store.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, config: &DbConfig) -> DbResult<Connection> {
    open_with("file", config, || Connection::open(path))
}

/// Opens a private in-memory SQLite database configured for the employee store.
pub fn open_db_in_memory(config: &DbConfig) -> DbResult<Connection> {
    open_with("memory", config, Connection::open_in_memory)
}

fn open_with<F>(mode: &str, config: &DbConfig, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, config) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    info!(
        "event=db_open module=db status=ok mode={mode} foreign_keys={} duration_ms={}",
        config.foreign_keys,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure_connection(conn: &Connection, config: &DbConfig) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}
