//! Temporal status of a task relative to "now".

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::{DurationPolicy, Task, TaskWindow};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Overdue,
    Ongoing,
    Upcoming,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Ongoing => "ongoing",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify with the default [`DurationPolicy`].
pub fn classify(task: &Task, now: NaiveDateTime) -> TaskStatus {
    classify_with(task, now, &DurationPolicy::default())
}

/// Rules are evaluated in order, first match wins:
/// completed, no due date (upcoming), inside the window (ongoing),
/// window already ended (overdue), otherwise upcoming.
pub fn classify_with(task: &Task, now: NaiveDateTime, policy: &DurationPolicy) -> TaskStatus {
    if task.is_done() {
        return TaskStatus::Completed;
    }

    let Some(span) = TaskWindow::resolve_with(task, policy).span() else {
        return TaskStatus::Upcoming;
    };

    if span.contains(now) {
        TaskStatus::Ongoing
    } else if span.end() <= now {
        TaskStatus::Overdue
    } else {
        TaskStatus::Upcoming
    }
}

/// Minutes left until the window ends, rounded up. `None` unless ongoing.
pub fn remaining_minutes(task: &Task, now: NaiveDateTime) -> Option<i64> {
    remaining_minutes_with(task, now, &DurationPolicy::default())
}

pub fn remaining_minutes_with(
    task: &Task,
    now: NaiveDateTime,
    policy: &DurationPolicy,
) -> Option<i64> {
    if classify_with(task, now, policy) != TaskStatus::Ongoing {
        return None;
    }
    let span = TaskWindow::resolve_with(task, policy).span()?;
    let seconds = (span.end() - now).num_seconds();
    Some((seconds + 59) / 60)
}
