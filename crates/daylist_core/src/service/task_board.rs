//! Board facade consumed by the presentation adapter.
//!
//! # Responsibility
//! - Translate user gestures into store mutations and edit-session moves.
//! - Produce the derived view (visible tasks, counts, daily percent, session).
//!
//! # Invariants
//! - The view is always recomputed from the store, never cached separately.
//! - Any delete path reconciles the edit session before returning.
//! - A declined confirmation applies no mutation.

use crate::model::task::{Task, TaskDate, TaskId};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use crate::service::completion_policy::{confirmation_reason, ConfirmationReason};
use crate::service::edit_session::{EditMode, EditSession, PendingInput};
use crate::storage::KeyValueStore;
use crate::view::ordering::{filter_tasks, FilterMode};
use crate::view::stats::{counts, daily_progress, TaskCounts};
use log::info;
use serde::Serialize;

/// Result of a completion toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Task is now completed.
    Completed,
    /// Task is now incomplete.
    Reopened,
    /// User declined the confirmation; nothing changed.
    Declined(ConfirmationReason),
}

/// Edit-session projection for rendering the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSessionView {
    pub mode: EditMode,
    pub editing_id: Option<TaskId>,
    pub prefill: PendingInput,
}

/// Everything the adapter needs to redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Date-sorted tasks passing the active filter and search.
    pub visible_tasks: Vec<Task>,
    /// Counts over the whole collection, independent of filter.
    pub stats: TaskCounts,
    pub daily_percent: u8,
    /// Whether the whole collection is empty.
    pub is_empty: bool,
    pub filter_mode: FilterMode,
    pub search_text: String,
    pub edit_session: EditSessionView,
}

pub struct TaskBoard<S: KeyValueStore> {
    store: TaskStore<S>,
    session: EditSession,
    filter_mode: FilterMode,
    search_text: String,
}

impl<S: KeyValueStore> TaskBoard<S> {
    /// Opens a board over `storage` with default filter and an idle session.
    pub fn open(storage: S) -> StoreResult<Self> {
        Ok(Self::from_store(TaskStore::open(storage)?))
    }

    pub fn from_store(store: TaskStore<S>) -> Self {
        Self {
            store,
            session: EditSession::new(),
            filter_mode: FilterMode::All,
            search_text: String::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Creates or updates a task depending on the edit session.
    pub fn submit_task(&mut self, text: &str, date: &str) -> StoreResult<Task> {
        self.session.submit(&mut self.store, text, date)
    }

    /// Deletes one task; absent ids are a no-op.
    pub fn request_delete(&mut self, id: TaskId) -> StoreResult<()> {
        self.store.remove(id)?;
        self.session.on_deleted(id);
        Ok(())
    }

    /// Deletes every task and resets the edit session.
    pub fn request_delete_all(&mut self) -> StoreResult<()> {
        self.store.clear()?;
        self.session.on_cleared();
        Ok(())
    }

    /// Flips completion of `id`, asking `confirm` first when policy requires.
    ///
    /// `confirm` is only invoked for off-day completions; returning `false`
    /// leaves the task unchanged. The slot is re-read first, so the policy
    /// sees the same record that `set_completed` then mutates.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    pub fn request_toggle_complete(
        &mut self,
        id: TaskId,
        today: TaskDate,
        confirm: impl FnOnce(ConfirmationReason) -> bool,
    ) -> StoreResult<ToggleOutcome> {
        self.store.reload()?;
        let task = self.store.get(id).ok_or(StoreError::NotFound(id))?;
        let completed = !task.completed;

        if let Some(reason) = confirmation_reason(task, today) {
            if !confirm(reason) {
                info!(
                    "event=task_toggle module=board status=declined task_id={} reason={}",
                    id,
                    reason.as_str()
                );
                return Ok(ToggleOutcome::Declined(reason));
            }
        }

        self.store.set_completed(id, completed)?;
        Ok(if completed {
            ToggleOutcome::Completed
        } else {
            ToggleOutcome::Reopened
        })
    }

    /// Enters edit mode for `id`, pre-filling its text and date.
    pub fn request_edit(&mut self, id: TaskId) -> StoreResult<()> {
        let task = self.store.get(id).ok_or(StoreError::NotFound(id))?;
        self.session.begin_edit(task);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Recomputes the derived view for `today`.
    pub fn view(&self, today: TaskDate) -> BoardView {
        let tasks = self.store.tasks();
        BoardView {
            visible_tasks: filter_tasks(tasks, self.filter_mode, &self.search_text),
            stats: counts(tasks),
            daily_percent: daily_progress(tasks, today),
            is_empty: tasks.is_empty(),
            filter_mode: self.filter_mode,
            search_text: self.search_text.clone(),
            edit_session: EditSessionView {
                mode: self.session.mode(),
                editing_id: self.session.editing_id(),
                prefill: self.session.pending().clone(),
            },
        }
    }
}
