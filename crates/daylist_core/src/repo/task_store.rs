//! Task store over a single key-value slot.
//!
//! # Responsibility
//! - Own the canonical, date-sorted task collection.
//! - Persist the whole collection as one JSON array on every mutation.
//!
//! # Invariants
//! - Every mutation is load → mutate → sort → write of the full collection.
//! - Ids are unique and strictly increasing across this store's lifetime.
//! - A failed mutation leaves both the slot and the cached collection unchanged.
//! - Corrupt slot content is recovered as an empty collection (logged at warn).

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::storage::{KeyValueStore, StorageError};
use crate::view::ordering::sort_by_date;
use chrono::Utc;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed namespaced slot key for the task collection.
pub const TASKS_STORAGE_KEY: &str = "daylist.tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any mutation.
    Validation(TaskValidationError),
    /// Target task does not exist.
    NotFound(TaskId),
    /// Slot content is not a valid task collection.
    CorruptData(String),
    /// Every id above the largest stored one is taken.
    IdSpaceExhausted,
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::CorruptData(message) => write!(f, "corrupt task data: {message}"),
            Self::IdSpaceExhausted => write!(f, "no task id left above the largest stored id"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::CorruptData(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Canonical task collection persisted under one storage key.
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Opens the store under [`TASKS_STORAGE_KEY`] and loads existing tasks.
    pub fn open(storage: S) -> StoreResult<Self> {
        Self::with_key(storage, TASKS_STORAGE_KEY)
    }

    /// Opens the store under a caller-chosen key.
    ///
    /// # Errors
    /// - `Storage` when the slot cannot be read. Corrupt content is not an error.
    pub fn with_key(storage: S, key: impl Into<String>) -> StoreResult<Self> {
        let mut store = Self {
            storage,
            key: key.into(),
            tasks: Vec::new(),
            ids: IdGenerator::default(),
        };
        store.tasks = store.load_recovering()?;
        info!(
            "event=store_open module=store status=ok task_count={}",
            store.tasks.len()
        );
        Ok(store)
    }

    /// Cached canonical collection, sorted by date.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and decodes the slot without touching the cache.
    ///
    /// Returns an empty list when the key is absent.
    ///
    /// # Errors
    /// - `CorruptData` when content is not a JSON array of valid tasks or
    ///   contains duplicate ids.
    pub fn load(&self) -> StoreResult<Vec<Task>> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> =
            serde_json::from_str(&raw).map_err(|err| StoreError::CorruptData(err.to_string()))?;

        let mut seen = HashSet::with_capacity(tasks.len());
        if let Some(duplicate) = tasks.iter().find(|task| !seen.insert(task.id)) {
            return Err(StoreError::CorruptData(format!(
                "duplicate task id {}",
                duplicate.id
            )));
        }

        Ok(sort_by_date(&tasks))
    }

    /// Re-reads the slot into the cache, recovering corrupt content as empty.
    pub fn reload(&mut self) -> StoreResult<&[Task]> {
        self.tasks = self.load_recovering()?;
        Ok(&self.tasks)
    }

    /// Creates an incomplete task and persists the collection.
    ///
    /// # Errors
    /// - `Validation` for blank text or a blank/malformed date.
    /// - `IdSpaceExhausted` when the largest stored id is `i64::MAX`.
    pub fn add(&mut self, text: &str, date: &str) -> StoreResult<Task> {
        let mut tasks = self.load_recovering()?;
        let id = self.ids.peek(&tasks)?;
        let task = Task::new(id, text, date)?;

        tasks.push(task.clone());
        self.persist(tasks)?;
        self.ids.commit(id);

        info!(
            "event=task_add module=store status=ok task_id={} task_count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Replaces text and date of an existing task and re-sorts.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Validation` with the same rules as [`TaskStore::add`].
    pub fn update(&mut self, id: TaskId, text: &str, date: &str) -> StoreResult<Task> {
        let mut tasks = self.load_recovering()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.reschedule(text, date)?;
        let updated = task.clone();

        self.persist(tasks)?;
        info!("event=task_update module=store status=ok task_id={id}");
        Ok(updated)
    }

    /// Sets the completion flag of an existing task.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> StoreResult<()> {
        let mut tasks = self.load_recovering()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.completed = completed;

        self.persist(tasks)?;
        info!("event=task_set_completed module=store status=ok task_id={id} completed={completed}");
        Ok(())
    }

    /// Removes a task. Returns `false` without writing when `id` is absent.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<bool> {
        let mut tasks = self.load_recovering()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);

        if tasks.len() == before {
            self.tasks = tasks;
            info!("event=task_remove module=store status=skipped task_id={id} reason=not_found");
            return Ok(false);
        }

        self.persist(tasks)?;
        info!(
            "event=task_remove module=store status=ok task_id={} task_count={}",
            id,
            self.tasks.len()
        );
        Ok(true)
    }

    /// Deletes every task by removing the storage key.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.storage.remove(&self.key)?;
        let removed = std::mem::take(&mut self.tasks).len();
        info!("event=task_clear module=store status=ok removed_count={removed}");
        Ok(())
    }

    fn load_recovering(&self) -> StoreResult<Vec<Task>> {
        match self.load() {
            Err(StoreError::CorruptData(message)) => {
                warn!(
                    "event=store_load module=store status=recovered error_code=corrupt_data error={message}"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn persist(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        let sorted = sort_by_date(&tasks);
        let encoded = serde_json::to_string(&sorted)
            .map_err(|err| StoreError::CorruptData(format!("encode failed: {err}")))?;
        self.storage.set(&self.key, &encoded)?;
        self.tasks = sorted;
        Ok(())
    }
}

/// Clock-seeded monotonic id source.
///
/// Next id is `max(now_ms, last_issued + 1, max_existing + 1)`, so two
/// tasks created within one millisecond still get distinct ids. Fails instead
/// of wrapping once `i64::MAX` is taken.
#[derive(Debug, Default)]
struct IdGenerator {
    last_issued: TaskId,
}

impl IdGenerator {
    fn peek(&self, existing: &[Task]) -> StoreResult<TaskId> {
        let max_existing = existing.iter().map(|task| task.id).max().unwrap_or(0);
        let after_issued = self.last_issued.checked_add(1);
        let after_existing = max_existing.checked_add(1);
        match (after_issued, after_existing) {
            (Some(after_issued), Some(after_existing)) => Ok(Utc::now()
                .timestamp_millis()
                .max(after_issued)
                .max(after_existing)),
            _ => {
                warn!("event=task_add module=store status=error error_code=id_space_exhausted");
                Err(StoreError::IdSpaceExhausted)
            }
        }
    }

    fn commit(&mut self, id: TaskId) {
        self.last_issued = self.last_issued.max(id);
    }
}
