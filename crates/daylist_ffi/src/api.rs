//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the board gestures (`submit`, `delete`, `toggle`, `edit`, filter,
//!   search) and the derived view to Dart via FRB.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide board is opened lazily and guarded by a mutex.
//! - Nothing is mutated when a confirmation is still required.

use daylist_core::{
    confirmation_reason, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, BoardView, EditMode, FilterMode, SqliteKeyValueStore, StoreError, Task,
    TaskBoard, TaskDate, TaskId, TaskValidationError, ToggleOutcome,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const BOARD_DB_FILE_NAME: &str = "daylist_tasks.sqlite3";
const BOARD_DB_PATH_ENV: &str = "DAYLIST_DB_PATH";

static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARD: Mutex<Option<TaskBoard<SqliteKeyValueStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Short display label (`Fri, Jan 10`).
    pub date_label: String,
    pub completed: bool,
}

/// Derived board state for a full redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewResponse {
    pub ok: bool,
    /// Visible tasks after filter and search, date-sorted.
    pub items: Vec<TaskItem>,
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub daily_percent: u8,
    /// True when no tasks exist at all (empty-state placeholder).
    pub is_empty: bool,
    pub filter_mode: String,
    pub search_text: String,
    /// `create` or `update`.
    pub edit_mode: String,
    pub editing_id: Option<i64>,
    pub prefill_text: String,
    pub prefill_date: String,
    pub message: String,
}

/// Generic action envelope for board gestures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task id, when one applies.
    pub task_id: Option<i64>,
    /// Input to highlight on validation failure (`text` or `date`).
    pub invalid_field: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id,
            invalid_field: None,
            message: message.into(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            task_id: None,
            invalid_field: None,
            message,
        }
    }

    fn from_store_error(context: &str, err: &StoreError) -> Self {
        let mut response = Self::failure(format!("{context} failed: {err}"));
        if let StoreError::Validation(validation) = err {
            response.invalid_field = Some(invalid_field(validation).to_string());
        }
        response
    }
}

/// Completion toggle envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskToggleResponse {
    pub ok: bool,
    /// Caller must ask the user and retry with `confirmed = true`.
    pub needs_confirmation: bool,
    /// Dialog text when `needs_confirmation` is set.
    pub prompt: Option<String>,
    /// New completion flag when the toggle was applied.
    pub completed: Option<bool>,
    pub message: String,
}

impl TaskToggleResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            needs_confirmation: false,
            prompt: None,
            completed: None,
            message,
        }
    }
}

/// Creates a task, or updates the one being edited.
///
/// # FFI contract
/// - Never panics.
/// - On validation failure `invalid_field` names the input to highlight.
#[flutter_rust_bridge::frb(sync)]
pub fn task_submit(text: String, date: String) -> TaskActionResponse {
    with_board(|board| {
        let updating = board.session().mode() == EditMode::Update;
        match board.submit_task(text.as_str(), date.as_str()) {
            Ok(task) => {
                let message = if updating {
                    "Task updated."
                } else {
                    "Task created."
                };
                TaskActionResponse::success(message, Some(task.id))
            }
            Err(err) => TaskActionResponse::from_store_error("task_submit", &err),
        }
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

/// Deletes one task. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    with_board(|board| match board.request_delete(id) {
        Ok(()) => TaskActionResponse::success("Task deleted.", Some(id)),
        Err(err) => TaskActionResponse::from_store_error("task_delete", &err),
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

/// Deletes every task and leaves edit mode.
///
/// The host is expected to confirm with the user before calling this.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete_all() -> TaskActionResponse {
    with_board(|board| match board.request_delete_all() {
        Ok(()) => TaskActionResponse::success("All tasks deleted.", None),
        Err(err) => TaskActionResponse::from_store_error("task_delete_all", &err),
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

/// Toggles completion of `id`.
///
/// # FFI contract
/// - With `confirmed = false`, an off-day completion is not applied; the
///   response carries `needs_confirmation = true` and the prompt text.
/// - With `confirmed = true`, the toggle is applied unconditionally.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_complete(id: i64, confirmed: bool) -> TaskToggleResponse {
    let today = TaskDate::today();
    with_board(|board| {
        let pending_reason = board
            .store()
            .get(id)
            .and_then(|task| confirmation_reason(task, today));
        match board.request_toggle_complete(id, today, |_| confirmed) {
            Ok(ToggleOutcome::Declined(reason)) => TaskToggleResponse {
                ok: true,
                needs_confirmation: true,
                prompt: Some(reason.prompt().to_string()),
                completed: None,
                message: "Confirmation required.".to_string(),
            },
            Ok(outcome) => {
                let completed = outcome == ToggleOutcome::Completed;
                TaskToggleResponse {
                    ok: true,
                    needs_confirmation: false,
                    prompt: None,
                    completed: Some(completed),
                    message: match (completed, pending_reason) {
                        (true, Some(_)) => "Task completed after confirmation.",
                        (true, None) => "Task completed.",
                        (false, _) => "Task reopened.",
                    }
                    .to_string(),
                }
            }
            Err(err) => {
                TaskToggleResponse::failure(format!("task_toggle_complete failed: {err}"))
            }
        }
    })
    .unwrap_or_else(TaskToggleResponse::failure)
}

/// Enters edit mode for `id`; the next `task_submit` updates it.
#[flutter_rust_bridge::frb(sync)]
pub fn task_begin_edit(id: i64) -> TaskActionResponse {
    with_board(|board| match board.request_edit(id) {
        Ok(()) => TaskActionResponse::success("Editing task.", Some(id)),
        Err(err) => TaskActionResponse::from_store_error("task_begin_edit", &err),
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_cancel_edit() -> TaskActionResponse {
    with_board(|board| {
        board.cancel_edit();
        TaskActionResponse::success("Edit cancelled.", None)
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

/// Sets the list filter (`all|active|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_filter(mode: String) -> TaskActionResponse {
    let Some(parsed) = FilterMode::parse(mode.as_str()) else {
        return TaskActionResponse::failure(format!(
            "unsupported filter `{}`; expected all|active|completed",
            mode.trim()
        ));
    };
    with_board(|board| {
        board.set_filter_mode(parsed);
        TaskActionResponse::success(format!("Filter set to {}.", parsed.as_str()), None)
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_search(text: String) -> TaskActionResponse {
    with_board(|board| {
        board.set_search_text(text);
        TaskActionResponse::success("Search updated.", None)
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

/// Returns the derived view for the current local day.
#[flutter_rust_bridge::frb(sync)]
pub fn task_view() -> TaskViewResponse {
    with_board(|board| to_view_response(board.view(TaskDate::today())))
        .unwrap_or_else(|message| TaskViewResponse {
            ok: false,
            items: Vec::new(),
            total: 0,
            completed: 0,
            pending: 0,
            daily_percent: 0,
            is_empty: true,
            filter_mode: FilterMode::All.as_str().to_string(),
            search_text: String::new(),
            edit_mode: EditMode::Create.as_str().to_string(),
            editing_id: None,
            prefill_text: String::new(),
            prefill_date: String::new(),
            message,
        })
}

fn to_view_response(view: BoardView) -> TaskViewResponse {
    let message = if view.is_empty {
        "No tasks yet.".to_string()
    } else {
        format!("Showing {} of {} task(s).", view.visible_tasks.len(), view.stats.total)
    };
    TaskViewResponse {
        ok: true,
        items: view.visible_tasks.iter().map(to_task_item).collect(),
        total: saturating_u32(view.stats.total),
        completed: saturating_u32(view.stats.completed),
        pending: saturating_u32(view.stats.pending),
        daily_percent: view.daily_percent,
        is_empty: view.is_empty,
        filter_mode: view.filter_mode.as_str().to_string(),
        search_text: view.search_text,
        edit_mode: view.edit_session.mode.as_str().to_string(),
        editing_id: view.edit_session.editing_id,
        prefill_text: view.edit_session.prefill.text,
        prefill_date: view.edit_session.prefill.date,
        message,
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        text: task.text.clone(),
        date: task.date.to_string(),
        date_label: task.date.display_label(),
        completed: task.completed,
    }
}

fn invalid_field(err: &TaskValidationError) -> &'static str {
    match err {
        TaskValidationError::EmptyText | TaskValidationError::NonPositiveId(_) => "text",
        TaskValidationError::EmptyDate | TaskValidationError::MalformedDate(_) => "date",
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(BOARD_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_board<T>(f: impl FnOnce(&mut TaskBoard<SqliteKeyValueStore>) -> T) -> Result<T, String> {
    let mut guard = BOARD.lock().map_err(|_| {
        warn!("event=board_lock module=ffi status=error error_code=poisoned");
        "board state lock poisoned".to_string()
    })?;

    if guard.is_none() {
        let storage = SqliteKeyValueStore::open(resolve_board_db_path())
            .map_err(|err| format!("board DB open failed: {err}"))?;
        let board =
            TaskBoard::open(storage).map_err(|err| format!("board init failed: {err}"))?;
        *guard = Some(board);
    }

    match guard.as_mut() {
        Some(board) => Ok(f(board)),
        None => Err("board unavailable".to_string()),
    }
}
