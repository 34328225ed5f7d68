//! Employee persistence with an identity map over SQLite.
//!
//! The store borrows an explicitly opened `rusqlite::Connection` and owns the
//! identity map, so cached records live exactly as long as the store.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbConfig, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::employee::{DepartmentId, Employee, EmployeeHandle, EmployeeId};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::identity_map::{EmployeeRow, IdentityMap};
pub use service::employee_service::EmployeeService;
