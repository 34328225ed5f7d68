//! Employee use-case service.
//!
//! # Responsibility
//! - Provide staffing operations (hire, reassign, retitle, dismiss) on top of
//!   any `EmployeeRepository`.
//!
//! # Invariants
//! - Every mutation is persisted through the repository before returning.
//! - Service layer remains storage-agnostic.

use crate::model::employee::{DepartmentId, EmployeeHandle, EmployeeId};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::error::RepoResult;
use crate::repo::{read_record, write_record};
use std::rc::Rc;

/// Use-case service wrapper for employee persistence.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Persists a new employee and returns its identity-mapped handle.
    pub fn hire(
        &mut self,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<EmployeeHandle> {
        self.repo.create(name, job_title, department_id)
    }

    /// Moves an employee to another department and saves.
    ///
    /// A foreign-key violation leaves the in-memory field changed while the
    /// row keeps its previous department.
    pub fn reassign(
        &mut self,
        employee: &EmployeeHandle,
        department_id: DepartmentId,
    ) -> RepoResult<()> {
        write_record(employee)?.department_id = department_id;
        self.repo.save(employee)
    }

    /// Changes an employee's job title and saves.
    pub fn retitle(&mut self, employee: &EmployeeHandle, job_title: &str) -> RepoResult<()> {
        write_record(employee)?.job_title = job_title.to_string();
        self.repo.save(employee)
    }

    /// Deletes an employee. The handle stays usable as a transient record.
    pub fn dismiss(&mut self, employee: &EmployeeHandle) -> RepoResult<()> {
        self.repo.delete(employee)
    }

    pub fn roster(&mut self) -> RepoResult<Vec<EmployeeHandle>> {
        self.repo.get_all()
    }

    pub fn lookup(&mut self, id: EmployeeId) -> RepoResult<Option<EmployeeHandle>> {
        self.repo.find_by_id(id)
    }

    pub fn lookup_by_name(&mut self, name: &str) -> RepoResult<Option<EmployeeHandle>> {
        self.repo.find_by_name(name)
    }

    /// Reloads an identity-mapped `employee` from its row, discarding unsaved
    /// edits.
    ///
    /// Returns `false` when the record is transient, its row is gone, or
    /// `employee` is not the handle mapped for its id (built with
    /// `Employee::with_id`, or owned by another store). An unmapped handle is
    /// left unchanged.
    pub fn refresh(&mut self, employee: &EmployeeHandle) -> RepoResult<bool> {
        let id = read_record(employee)?.id;
        let Some(id) = id else {
            return Ok(false);
        };
        let refreshed = self
            .repo
            .find_by_id(id)?
            .is_some_and(|mapped| Rc::ptr_eq(&mapped, employee));
        Ok(refreshed)
    }
}
