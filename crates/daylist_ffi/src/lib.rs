//! Flutter bridge for the Daylist core.
//!
//! Exposes use-case level functions only; all state rules live in
//! `daylist_core`.

pub mod api;
