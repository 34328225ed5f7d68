//! Identity map for persisted employees.
//!
//! # Responsibility
//! - Keep exactly one in-memory handle per persisted employee id.
//! - Reconcile freshly fetched rows into existing handles.
//!
//! # Invariants
//! - Keys always equal the `id` stored in the mapped record.
//! - Entries are only removed by explicit eviction; there is no size bound.
//! - Reconciling a known id overwrites the record in place and discards any
//!   unsaved edits made through other clones of the handle.

use crate::model::employee::{DepartmentId, Employee, EmployeeHandle, EmployeeId};
use crate::repo::error::{RepoError, RepoResult};
use log::trace;
use std::collections::HashMap;
use std::rc::Rc;

/// Raw `employees` row in `SELECT *` column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub name: String,
    pub job_title: String,
    pub department_id: DepartmentId,
}

impl EmployeeRow {
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            job_title: job_title.into(),
            department_id,
        }
    }
}

/// Id-keyed cache of employee handles owned by one store.
#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: HashMap<EmployeeId, EmployeeHandle>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the mapped handle for `id`.
    pub fn get(&self, id: EmployeeId) -> Option<EmployeeHandle> {
        self.entries.get(&id).map(Rc::clone)
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped ids in ascending order.
    pub fn ids(&self) -> Vec<EmployeeId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Maps `id` to `handle`, replacing any previous entry.
    pub fn register(&mut self, id: EmployeeId, handle: &EmployeeHandle) {
        self.entries.insert(id, Rc::clone(handle));
    }

    /// Removes the entry for `id`. Evicting an unknown id is a no-op.
    pub fn evict(&mut self, id: EmployeeId) -> Option<EmployeeHandle> {
        self.entries.remove(&id)
    }

    /// Returns the single handle for `row.id`, refreshed from `row`.
    ///
    /// # Errors
    /// - `RepoError::RecordBorrowed` when the mapped handle is borrowed
    ///   elsewhere and cannot be overwritten.
    pub fn reconcile(&mut self, row: EmployeeRow) -> RepoResult<EmployeeHandle> {
        if let Some(existing) = self.entries.get(&row.id) {
            {
                let mut employee = existing
                    .try_borrow_mut()
                    .map_err(|_| RepoError::RecordBorrowed(Some(row.id)))?;
                employee.name = row.name;
                employee.job_title = row.job_title;
                employee.department_id = row.department_id;
            }
            trace!(
                "event=employee_reconcile module=repo status=ok mode=refresh id={}",
                row.id
            );
            return Ok(Rc::clone(existing));
        }

        let id = row.id;
        let handle =
            Employee::with_id(id, row.name, row.job_title, row.department_id).into_handle();
        self.entries.insert(id, Rc::clone(&handle));
        trace!("event=employee_reconcile module=repo status=ok mode=register id={id}");
        Ok(handle)
    }
}
