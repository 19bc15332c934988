//! Completion statistics.

use crate::model::task::{Task, TaskDate};
use serde::Serialize;

/// Aggregate completion counts. `total == completed + pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub fn counts(tasks: &[Task]) -> TaskCounts {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskCounts {
        total,
        completed,
        pending: total - completed,
    }
}

/// Percentage (0..=100) of tasks dated exactly `today` that are completed.
///
/// Rounds half up; returns 0 when nothing is due today.
pub fn daily_progress(tasks: &[Task], today: TaskDate) -> u8 {
    let (due, done) = tasks
        .iter()
        .filter(|task| task.date == today)
        .fold((0_u64, 0_u64), |(due, done), task| {
            (due + 1, done + u64::from(task.completed))
        });

    if due == 0 {
        return 0;
    }

    let percent = (200 * done + due) / (2 * due);
    u8::try_from(percent).unwrap_or(100)
}
