//! Date ordering and filter/search predicates.
//!
//! # Invariants
//! - `sort_by_date` is stable: equal dates keep insertion order.
//! - Search is ANDed with the filter mode and never trims its input.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// Completion-state filter applied to the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    /// Incomplete tasks only.
    Active,
    Completed,
}

impl FilterMode {
    /// Parses the adapter wire name (`all|active|completed`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Returns a copy ordered ascending by date.
pub fn sort_by_date(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| task.date);
    sorted
}

/// Returns tasks passing both the mode predicate and the text search.
///
/// `search_text` is a case-insensitive substring test against `text`;
/// an empty string matches everything.
pub fn filter_tasks(tasks: &[Task], mode: FilterMode, search_text: &str) -> Vec<Task> {
    let needle = search_text.to_lowercase();
    tasks
        .iter()
        .filter(|task| mode.matches(task) && matches_search(task, needle.as_str()))
        .cloned()
        .collect()
}

fn matches_search(task: &Task, lowered_needle: &str) -> bool {
    lowered_needle.is_empty() || task.text.to_lowercase().contains(lowered_needle)
}
