//! Persistence-facing task store.
//!
//! # Responsibility
//! - Own the canonical task collection and its read-modify-write cycle.
//! - Isolate slot encoding details from services and views.
//!
//! # Invariants
//! - Store writes validate input before persistence.
//! - Store APIs return semantic errors (`NotFound`, `CorruptData`) in
//!   addition to storage transport errors.

pub mod task_store;
