//! SQLite session bootstrap for the employee store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for the store to borrow.
//! - Apply connection pragmas described by [`DbConfig`].
//!
//! # Invariants
//! - The crate never creates the `departments` table; it only references it.
//! - Every statement runs in auto-commit mode; no transaction is held open.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Connection options supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Mirrors `PRAGMA foreign_keys`. When off, inserts referencing a missing
    /// department succeed silently.
    pub foreign_keys: bool,
    /// Busy handler timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DbConfig;

    #[test]
    fn default_config_enforces_foreign_keys() {
        let config = DbConfig::default();
        assert!(config.foreign_keys);
        assert_eq!(config.busy_timeout_ms, 5_000);
    }
}
