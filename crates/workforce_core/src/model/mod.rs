//! Domain records mapped onto relational rows.
//!
//! # Invariants
//! - A record without an id has never been persisted.
//! - Records are shared through [`employee::EmployeeHandle`] so reconciliation
//!   writes are visible to every holder.

pub mod employee;
