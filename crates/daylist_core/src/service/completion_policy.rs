//! Confirmation gate for completing off-day tasks.
//!
//! Completing a task dated strictly before or after today needs an explicit
//! user confirmation. Re-opening a completed task never does.

use crate::model::task::{Task, TaskDate};
use std::cmp::Ordering;

/// Why completing a task needs the user to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationReason {
    /// Task date is after today.
    ScheduledInFuture,
    /// Task date is before today.
    Overdue,
}

impl ConfirmationReason {
    /// Prompt text shown by the confirmation dialog.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::ScheduledInFuture => {
                "This task is scheduled for the future. Are you sure you have finished it?"
            }
            Self::Overdue => "This task is overdue. Are you sure you have finished it?",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScheduledInFuture => "scheduled_in_future",
            Self::Overdue => "overdue",
        }
    }
}

/// Returns the confirmation reason for toggling `task`, if any.
pub fn confirmation_reason(task: &Task, today: TaskDate) -> Option<ConfirmationReason> {
    if task.completed {
        return None;
    }
    match task.date.cmp(&today) {
        Ordering::Greater => Some(ConfirmationReason::ScheduledInFuture),
        Ordering::Less => Some(ConfirmationReason::Overdue),
        Ordering::Equal => None,
    }
}

pub fn requires_confirmation(task: &Task, today: TaskDate) -> bool {
    confirmation_reason(task, today).is_some()
}
