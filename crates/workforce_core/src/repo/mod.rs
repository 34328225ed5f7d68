//! Repository layer: SQL mapping plus the identity map it maintains.
//!
//! # Responsibility
//! - Isolate SQLite statements from service-level orchestration.
//! - Guarantee at most one in-memory handle per persisted employee id.
//!
//! # Invariants
//! - Not-found is a value (`None`), database failures are `RepoError::Db`.
//! - Borrow conflicts on a handle surface as `RepoError::RecordBorrowed`,
//!   never as a panic.

pub mod employee_repo;
pub mod error;
pub mod identity_map;

use crate::model::employee::{Employee, EmployeeHandle};
use error::{RepoError, RepoResult};
use std::cell::{Ref, RefMut};

pub(crate) fn read_record(employee: &EmployeeHandle) -> RepoResult<Ref<'_, Employee>> {
    employee
        .try_borrow()
        .map_err(|_| RepoError::RecordBorrowed(None))
}

pub(crate) fn write_record(employee: &EmployeeHandle) -> RepoResult<RefMut<'_, Employee>> {
    employee.try_borrow_mut().map_err(|_| {
        // Readers still allow the id to be reported; a writer hides it.
        let id = employee.try_borrow().ok().and_then(|record| record.id);
        RepoError::RecordBorrowed(id)
    })
}
