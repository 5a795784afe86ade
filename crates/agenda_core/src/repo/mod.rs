//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate entities before persistence.
//! - Repository APIs return semantic errors (`App`, `SubjectNotFound`) in
//!   addition to DB transport errors.

pub mod agenda_repo;
pub(crate) mod schema;
