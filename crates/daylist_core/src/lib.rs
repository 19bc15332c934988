//! Core task state engine for Daylist.
//! This crate is the single source of truth for task invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskDate, TaskId, TaskValidationError};
pub use repo::task_store::{StoreError, StoreResult, TaskStore, TASKS_STORAGE_KEY};
pub use service::completion_policy::{
    confirmation_reason, requires_confirmation, ConfirmationReason,
};
pub use service::edit_session::{EditMode, EditSession, EditState, PendingInput};
pub use service::task_board::{BoardView, EditSessionView, TaskBoard, ToggleOutcome};
pub use storage::{
    KeyValueStore, MemoryStore, SqliteKeyValueStore, StorageError, SLOT_SCHEMA_VERSION,
};
pub use view::ordering::{filter_tasks, sort_by_date, FilterMode};
pub use view::stats::{counts, daily_progress, TaskCounts};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
