//! Domain model for subjects and their dated tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Validate entities at construction so invalid data never reaches storage.
//!
//! # Invariants
//! - Entity identities are assigned by the store only.
//! - Entities are never updated in place or deleted.

pub mod error;
pub mod subject;
pub mod task;
pub mod validate;
