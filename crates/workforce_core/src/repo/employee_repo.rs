//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map employee records onto the `employees` table.
//! - Route every fetched row through the store-owned identity map.
//!
//! # Invariants
//! - Each write is a single auto-committed statement.
//! - Lookups that match nothing return `Ok(None)`, never an error.
//! - Field contents are never validated here; SQLite constraints decide.
//! - A record borrowed by the caller is rejected before any statement runs.
//! - Re-fetching a known id overwrites the in-memory record, including any
//!   unsaved edits. Callers that need their edits must `save` first.

use crate::model::employee::{DepartmentId, Employee, EmployeeHandle, EmployeeId};
use crate::repo::error::RepoResult;
use crate::repo::identity_map::{EmployeeRow, IdentityMap};
use crate::repo::{read_record, write_record};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    job_title TEXT NOT NULL,
    department_id INTEGER NOT NULL,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);";
const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS employees;";
const INSERT_SQL: &str = "INSERT INTO employees (name, job_title, department_id) VALUES (?, ?, ?)";
const UPDATE_SQL: &str =
    "UPDATE employees SET name = ?, job_title = ?, department_id = ? WHERE id = ?";
const DELETE_SQL: &str = "DELETE FROM employees WHERE id = ?";
const SELECT_ALL_SQL: &str = "SELECT * FROM employees";
const SELECT_BY_ID_SQL: &str = "SELECT * FROM employees WHERE id = ?";
const SELECT_BY_NAME_SQL: &str = "SELECT * FROM employees WHERE name = ?";

/// Persistence and lookup operations for employees.
///
/// Handles returned by any method are the identity-mapped instances: two
/// lookups of the same id yield clones of one `Rc`.
pub trait EmployeeRepository {
    /// Creates the `employees` table if it does not exist.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops the `employees` table if it exists. The identity map is kept.
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts a transient record or updates a persisted one.
    fn save(&mut self, employee: &EmployeeHandle) -> RepoResult<()>;
    /// Writes all mutable fields keyed by id. Matching no row is not an error.
    fn update(&mut self, employee: &EmployeeHandle) -> RepoResult<()>;
    /// Deletes the row, evicts the handle and resets its id to `None`.
    fn delete(&mut self, employee: &EmployeeHandle) -> RepoResult<()>;
    /// Builds a transient record and saves it immediately.
    fn create(
        &mut self,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<EmployeeHandle>;
    /// Reconciles one raw row into the identity map.
    fn instance_from_db(&mut self, row: EmployeeRow) -> RepoResult<EmployeeHandle>;
    /// Returns every row in database order.
    fn get_all(&mut self) -> RepoResult<Vec<EmployeeHandle>>;
    fn find_by_id(&mut self, id: EmployeeId) -> RepoResult<Option<EmployeeHandle>>;
    /// Returns the first row with an exactly matching name.
    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<EmployeeHandle>>;
}

/// SQLite-backed employee store owning its identity map.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
    identity_map: IdentityMap,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates a store over `conn` with an empty identity map.
    ///
    /// The `employees` table is not created here; call
    /// [`EmployeeRepository::create_table`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            identity_map: IdentityMap::new(),
        }
    }

    pub fn identity_map(&self) -> &IdentityMap {
        &self.identity_map
    }

    fn insert(&mut self, employee: &EmployeeHandle) -> RepoResult<()> {
        let id = {
            let mut record = write_record(employee)?;
            self.conn.execute(
                INSERT_SQL,
                params![
                    record.name.as_str(),
                    record.job_title.as_str(),
                    record.department_id
                ],
            )?;
            let id = self.conn.last_insert_rowid();
            record.id = Some(id);
            id
        };

        self.identity_map.register(id, employee);
        debug!("event=employee_insert module=repo status=ok id={id}");
        Ok(())
    }

    fn fetch_one(
        &mut self,
        sql: &str,
        param: &dyn ToSql,
    ) -> RepoResult<Option<EmployeeHandle>> {
        let row = self
            .conn
            .query_row(sql, [param], parse_employee_row)
            .optional()?;

        match row {
            Some(row) => Ok(Some(self.instance_from_db(row)?)),
            None => Ok(None),
        }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        debug!("event=employees_table_create module=repo status=ok");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(DROP_TABLE_SQL)?;
        debug!("event=employees_table_drop module=repo status=ok");
        Ok(())
    }

    fn save(&mut self, employee: &EmployeeHandle) -> RepoResult<()> {
        let persisted = read_record(employee)?.is_persisted();
        if persisted {
            self.update(employee)
        } else {
            self.insert(employee)
        }
    }

    fn update(&mut self, employee: &EmployeeHandle) -> RepoResult<()> {
        let record = read_record(employee)?;
        let changed = self.conn.execute(
            UPDATE_SQL,
            params![
                record.name.as_str(),
                record.job_title.as_str(),
                record.department_id,
                record.id
            ],
        )?;

        if changed == 0 {
            warn!(
                "event=employee_update module=repo status=noop id={}",
                display_id(record.id)
            );
        } else {
            debug!(
                "event=employee_update module=repo status=ok id={}",
                display_id(record.id)
            );
        }
        Ok(())
    }

    fn delete(&mut self, employee: &EmployeeHandle) -> RepoResult<()> {
        let mut record = write_record(employee)?;
        let id = record.id;
        let changed = self.conn.execute(DELETE_SQL, params![id])?;

        if let Some(id) = id {
            self.identity_map.evict(id);
        }
        record.id = None;

        if changed == 0 {
            warn!(
                "event=employee_delete module=repo status=noop id={}",
                display_id(id)
            );
        } else {
            debug!(
                "event=employee_delete module=repo status=ok id={}",
                display_id(id)
            );
        }
        Ok(())
    }

    fn create(
        &mut self,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<EmployeeHandle> {
        let employee = Employee::new(name, job_title, department_id).into_handle();
        self.save(&employee)?;
        Ok(employee)
    }

    fn instance_from_db(&mut self, row: EmployeeRow) -> RepoResult<EmployeeHandle> {
        self.identity_map.reconcile(row)
    }

    fn get_all(&mut self) -> RepoResult<Vec<EmployeeHandle>> {
        select_all_rows(self.conn)?
            .into_iter()
            .map(|row| self.instance_from_db(row))
            .collect()
    }

    fn find_by_id(&mut self, id: EmployeeId) -> RepoResult<Option<EmployeeHandle>> {
        self.fetch_one(SELECT_BY_ID_SQL, &id)
    }

    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<EmployeeHandle>> {
        self.fetch_one(SELECT_BY_NAME_SQL, &name)
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<EmployeeRow> {
    Ok(EmployeeRow {
        id: row.get("id")?,
        name: row.get("name")?,
        job_title: row.get("job_title")?,
        department_id: row.get("department_id")?,
    })
}

fn select_all_rows(conn: &Connection) -> rusqlite::Result<Vec<EmployeeRow>> {
    let mut stmt = conn.prepare(SELECT_ALL_SQL)?;
    let rows = stmt.query_map([], parse_employee_row)?;
    rows.collect()
}

fn display_id(id: Option<EmployeeId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
