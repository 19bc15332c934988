//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by the task store.
//! - Validate user-supplied text/date before a record is accepted.
//!
//! # Invariants
//! - Newly created tasks get a positive id; stored ids are accepted as-is.
//! - `text` is trimmed and non-empty.
//! - `date` is a real calendar day in strict `YYYY-MM-DD` form.
//! - Deserialization enforces the same rules as construction.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_LABEL_FORMAT: &str = "%a, %b %-d";

/// Stable identifier for a task record.
pub type TaskId = i64;

/// Validation failures for task input and persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty after trimming.
    EmptyText,
    /// Date input is empty after trimming.
    EmptyDate,
    /// Date input is not a strict `YYYY-MM-DD` calendar day.
    MalformedDate(String),
    /// A new task was offered an id of zero or below.
    NonPositiveId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
            Self::EmptyDate => write!(f, "task date must not be blank"),
            Self::MalformedDate(value) => {
                write!(f, "task date `{value}` is not a YYYY-MM-DD calendar date")
            }
            Self::NonPositiveId(id) => write!(f, "task id must be positive, got {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// Calendar day a task is scheduled for. No time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    /// Parses strict `YYYY-MM-DD` input, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// - `EmptyDate` for blank input.
    /// - `MalformedDate` for any other shape or an impossible day.
    pub fn parse(raw: &str) -> Result<Self, TaskValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyDate);
        }
        if !ISO_DATE_RE.is_match(trimmed) {
            return Err(TaskValidationError::MalformedDate(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
            .map(Self)
            .map_err(|_| TaskValidationError::MalformedDate(trimmed.to_string()))
    }

    /// Current local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Short human label, e.g. `Fri, Jan 10`.
    pub fn display_label(&self) -> String {
        self.0.format(DISPLAY_LABEL_FORMAT).to_string()
    }
}

impl Display for TaskDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

impl TryFrom<String> for TaskDate {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<TaskDate> for String {
    fn from(value: TaskDate) -> Self {
        value.to_string()
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, non-empty label.
    pub text: String,
    pub date: TaskDate,
    pub completed: bool,
}

/// Unvalidated wire shape used while decoding persisted tasks.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    text: String,
    date: TaskDate,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(value: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: value.id,
            text: value.text,
            date: value.date,
            completed: value.completed,
        };
        task.validate()?;
        Ok(task)
    }
}

impl Task {
    /// Creates an incomplete task from raw user input.
    ///
    /// # Invariants
    /// - `id` is positive.
    /// - `text` is stored trimmed.
    /// - `completed` starts as `false`.
    pub fn new(id: TaskId, text: &str, date: &str) -> Result<Self, TaskValidationError> {
        if id <= 0 {
            return Err(TaskValidationError::NonPositiveId(id));
        }
        let text = normalize_text(text)?;
        let date = TaskDate::parse(date)?;
        Ok(Self {
            id,
            text,
            date,
            completed: false,
        })
    }

    /// Checks invariants of a persisted record.
    ///
    /// Any integer id is accepted; only [`Task::new`] requires a positive one.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Replaces text and date after validating both.
    ///
    /// Leaves the task untouched when either input is rejected.
    pub fn reschedule(&mut self, text: &str, date: &str) -> Result<(), TaskValidationError> {
        let text = normalize_text(text)?;
        let date = TaskDate::parse(date)?;
        self.text = text;
        self.date = date;
        Ok(())
    }
}

/// Trims task text and rejects blank input.
pub fn normalize_text(text: &str) -> Result<String, TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}
