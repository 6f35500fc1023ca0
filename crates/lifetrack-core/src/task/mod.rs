//! Task record consumed by the classification engine.
//!
//! Tasks arrive from the persistence layer with loosely typed time fields
//! (`due_time` / `end_time` are raw `HH:MM` strings). The engine never
//! mutates them; [`window::TaskWindow`] turns the raw fields into a typed
//! window on every read.

pub mod window;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use window::{
    parse_clock_time, DurationPolicy, TaskWindow, TimeRange, MAX_DEFAULT_MINUTES, MAX_MIN_MINUTES,
};

/// Two-level rating used for urgency and importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

/// Descriptive priority tier. Only used for styling, never for classification.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Part of the day a task belongs to in the `time` quadrant mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// A checklist item under a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    /// Create an open subtask with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A task as stored by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque stable identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Calendar date the task is due on
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Local start time, `HH:MM`
    #[serde(default)]
    pub due_time: Option<String>,
    /// Local end time, `HH:MM`; earlier than `due_time` means the next day
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Set iff `is_completed`
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// When active work began
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub urgency: Level,
    #[serde(default)]
    pub importance: Level,
    #[serde(default)]
    pub priority: Priority,
    /// Stored bucket for the `time` mode when there is no usable `due_time`
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Accumulated focus time, maintained by the focus timer
    #[serde(default)]
    pub total_focus_minutes: u32,
}

impl Task {
    /// Create an open task with no date, low urgency and importance.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            due_date: None,
            due_time: None,
            end_time: None,
            is_completed: false,
            completed_at: None,
            started_at: None,
            urgency: Level::Low,
            importance: Level::Low,
            priority: Priority::Medium,
            time_of_day: TimeOfDay::Morning,
            tags: Vec::new(),
            subtasks: Vec::new(),
            total_focus_minutes: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_due_time(mut self, time: impl Into<String>) -> Self {
        self.due_time = Some(time.into());
        self
    }

    pub fn with_end_time(mut self, time: impl Into<String>) -> Self {
        self.end_time = Some(time.into());
        self
    }

    pub fn with_urgency(mut self, urgency: Level) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_importance(mut self, importance: Level) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_time_of_day(mut self, bucket: TimeOfDay) -> Self {
        self.time_of_day = bucket;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_subtask(mut self, subtask: Subtask) -> Self {
        self.subtasks.push(subtask);
        self
    }

    /// Completed tasks are classified `completed` regardless of time fields.
    pub fn is_done(&self) -> bool {
        self.is_completed || self.completed_at.is_some()
    }

    /// Mark completed, keeping `completed_at` in step with the flag.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }

    pub fn reopen(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
    }

    /// Record when active work began. Later calls keep the first timestamp.
    pub fn start(&mut self, at: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(at);
        }
    }

    pub fn add_focus_minutes(&mut self, minutes: u32) {
        self.total_focus_minutes = self.total_focus_minutes.saturating_add(minutes);
    }
}
