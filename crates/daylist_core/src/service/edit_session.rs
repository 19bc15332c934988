//! Create-vs-update edit session.
//!
//! # Responsibility
//! - Track whether submitted input creates a task or updates a pinned one.
//! - Hold the pending input shown in the entry fields.
//!
//! # Invariants
//! - `Editing(id)` never outlives task `id`: deletion or clear forces `Idle`.
//! - Leaving `Editing` always clears pending input.
//!
//! State flow: `Idle --begin_edit--> Editing --submit|cancel|deleted--> Idle`.

use crate::model::task::{Task, TaskId};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use crate::storage::KeyValueStore;
use log::{debug, info};
use serde::Serialize;

/// Current edit-session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    /// Submitting creates a new task.
    #[default]
    Idle,
    /// Submitting updates the pinned task.
    Editing(TaskId),
}

/// Adapter-facing projection of [`EditState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    Create,
    Update,
}

impl EditMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Entry-field contents owned by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingInput {
    pub text: String,
    pub date: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: EditState,
    pending: PendingInput,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    pub fn mode(&self) -> EditMode {
        match self.state {
            EditState::Idle => EditMode::Create,
            EditState::Editing(_) => EditMode::Update,
        }
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        match self.state {
            EditState::Idle => None,
            EditState::Editing(id) => Some(id),
        }
    }

    /// Pins `task` for update and pre-fills pending input from it.
    pub fn begin_edit(&mut self, task: &Task) {
        self.state = EditState::Editing(task.id);
        self.pending = PendingInput {
            text: task.text.clone(),
            date: task.date.to_string(),
        };
        debug!("event=edit_begin module=session task_id={}", task.id);
    }

    /// Creates or updates a task depending on the current state.
    ///
    /// # Contract
    /// - `Idle`: delegates to `TaskStore::add`.
    /// - `Editing(id)`: delegates to `TaskStore::update(id, ..)`, then `Idle`.
    /// - Success clears pending input.
    /// - Validation failure keeps state so the user can correct the input.
    /// - `NotFound` while editing resets to `Idle`.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        store: &mut TaskStore<S>,
        text: &str,
        date: &str,
    ) -> StoreResult<Task> {
        let result = match self.state {
            EditState::Idle => store.add(text, date),
            EditState::Editing(id) => store.update(id, text, date),
        };

        match &result {
            Ok(_) => self.reset(),
            Err(StoreError::NotFound(id)) => {
                info!("event=edit_submit module=session status=reset task_id={id} reason=not_found");
                self.reset();
            }
            Err(_) => {}
        }
        result
    }

    /// Abandons the current edit.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Reconciles after task `id` was deleted by any path.
    pub fn on_deleted(&mut self, id: TaskId) {
        if self.state == EditState::Editing(id) {
            info!("event=edit_reset module=session status=ok task_id={id} reason=deleted");
            self.reset();
        }
    }

    /// Reconciles after the whole collection was cleared.
    pub fn on_cleared(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = EditState::Idle;
        self.pending = PendingInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{EditMode, EditSession, EditState};
    use crate::repo::task_store::{StoreError, TaskStore};
    use crate::storage::MemoryStore;

    #[test]
    fn idle_submit_adds_and_stays_idle() {
        let mut store = TaskStore::open(MemoryStore::new()).unwrap();
        let mut session = EditSession::new();

        let task = session.submit(&mut store, "Buy milk", "2025-01-10").unwrap();
        assert_eq!(session.state(), EditState::Idle);
        assert_eq!(store.get(task.id).unwrap().text, "Buy milk");
    }

    #[test]
    fn editing_submit_updates_pinned_task_and_returns_to_idle() {
        let mut store = TaskStore::open(MemoryStore::new()).unwrap();
        let mut session = EditSession::new();
        let task = store.add("Buy milk", "2025-01-10").unwrap();

        session.begin_edit(&task);
        assert_eq!(session.mode(), EditMode::Update);
        assert_eq!(session.pending().date, "2025-01-10");

        let updated = session.submit(&mut store, "Buy oat milk", "2025-01-11").unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(session.state(), EditState::Idle);
        assert!(session.pending().text.is_empty());
    }

    #[test]
    fn validation_failure_keeps_edit_state() {
        let mut store = TaskStore::open(MemoryStore::new()).unwrap();
        let mut session = EditSession::new();
        let task = store.add("Buy milk", "2025-01-10").unwrap();

        session.begin_edit(&task);
        let err = session.submit(&mut store, "  ", "2025-01-11").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(session.state(), EditState::Editing(task.id));
        assert_eq!(session.pending().text, "Buy milk");
    }

    #[test]
    fn deleting_another_task_keeps_edit_state() {
        let mut store = TaskStore::open(MemoryStore::new()).unwrap();
        let mut session = EditSession::new();
        let task = store.add("Buy milk", "2025-01-10").unwrap();

        session.begin_edit(&task);
        session.on_deleted(task.id + 1);
        assert_eq!(session.editing_id(), Some(task.id));
    }
}
