//! Error type shared by the repository modules.

use crate::db::DbError;
use crate::model::employee::EmployeeId;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for employee persistence and reconciliation.
#[derive(Debug)]
pub enum RepoError {
    /// Statement or session failure, including constraint violations.
    Db(DbError),
    /// The record is borrowed elsewhere; nothing was read or written.
    /// `None` when the record is transient or its id could not be read.
    RecordBorrowed(Option<EmployeeId>),
}

impl RepoError {
    /// Returns whether SQLite rejected the statement on a constraint
    /// (foreign key, `NOT NULL`, primary key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _)))
                if failure.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::RecordBorrowed(Some(id)) => write!(f, "employee {id} is borrowed elsewhere"),
            Self::RecordBorrowed(None) => write!(f, "employee record is borrowed elsewhere"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::RecordBorrowed(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
