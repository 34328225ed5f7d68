//! Employee domain model.
//!
//! # Responsibility
//! - Define the record persisted in the `employees` table.
//! - Provide the shared handle type used by the identity map.
//!
//! # Invariants
//! - `id` is `None` until the database assigns a row id on first insert.
//! - `department_id` is a raw foreign key; no department is ever loaded.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Database-assigned primary key of an employee row.
pub type EmployeeId = i64;

/// Primary key of a row in the externally owned `departments` table.
pub type DepartmentId = i64;

/// Shared, interior-mutable reference to one in-memory employee.
///
/// The identity map and every caller hold clones of the same handle, so a
/// reconciliation write through one clone is observed by all of them.
pub type EmployeeHandle = Rc<RefCell<Employee>>;

/// An employee record mapped onto one `employees` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Assigned by SQLite on first insert; reset to `None` on delete.
    pub id: Option<EmployeeId>,
    pub name: String,
    pub job_title: String,
    /// Enforced by the database foreign key when `foreign_keys` is on.
    pub department_id: DepartmentId,
}

impl Employee {
    /// Creates a transient (never persisted) employee.
    ///
    /// Field contents are not validated.
    pub fn new(
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            job_title: job_title.into(),
            department_id,
        }
    }

    /// Creates an employee that already carries a persisted row id.
    pub fn with_id(
        id: EmployeeId,
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, job_title, department_id)
        }
    }

    /// Returns whether this record has been assigned a row id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Wraps the record into a shareable handle.
    pub fn into_handle(self) -> EmployeeHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Employee {id}: ")?,
            None => write!(f, "<Employee None: ")?,
        }
        write!(
            f,
            "{}, {}, Department ID: {}>",
            self.name, self.job_title, self.department_id
        )
    }
}
