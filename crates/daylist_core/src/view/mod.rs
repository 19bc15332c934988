//! Derived read-only views over the canonical task collection.
//!
//! # Responsibility
//! - Order, filter, and search task snapshots.
//! - Aggregate completion counts and the daily progress metric.
//!
//! # Invariants
//! - View functions never mutate their input.

pub mod ordering;
pub mod stats;
