//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its calendar-date value type.
//! - Keep input validation rules in one place for store and decode paths.
//!
//! # Invariants
//! - Every task is identified by a stable, unique `TaskId`.
//! - Deletion is a hard delete from the canonical collection.

pub mod task;
