//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate task store calls into gesture-level APIs.
//! - Keep the edit-session state machine and completion policy out of the
//!   presentation layer.

pub mod completion_policy;
pub mod edit_session;
pub mod task_board;
