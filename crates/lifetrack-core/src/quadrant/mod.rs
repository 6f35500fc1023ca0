//! Quadrant assignment across the four classification modes.
//!
//! Every task lands in exactly one of the four quadrants of a mode. The only
//! exception is opt-in: with [`UndatedPolicy::Exclude`] undated tasks have no
//! `date` quadrant.

mod buckets;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use buckets::{DateBucket, DayParts};

use crate::error::ValidationError;
use crate::status::{classify_with, TaskStatus};
use crate::task::{DurationPolicy, Level, Task, TimeOfDay};

/// Classification mode selected by the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuadrantMode {
    UrgentImportant,
    Status,
    Date,
    Time,
}

impl QuadrantMode {
    pub const ALL: [QuadrantMode; 4] = [
        QuadrantMode::UrgentImportant,
        QuadrantMode::Status,
        QuadrantMode::Date,
        QuadrantMode::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent-important",
            Self::Status => "status",
            Self::Date => "date",
            Self::Time => "time",
        }
    }

    /// The four quadrants of this mode, in display order.
    pub fn quadrants(&self) -> [Quadrant; 4] {
        match self {
            Self::UrgentImportant => [
                Quadrant::UrgentImportant,
                Quadrant::UrgentNotImportant,
                Quadrant::NotUrgentImportant,
                Quadrant::NotUrgentNotImportant,
            ],
            Self::Status => [
                Quadrant::Overdue,
                Quadrant::Ongoing,
                Quadrant::Upcoming,
                Quadrant::Completed,
            ],
            Self::Date => [
                Quadrant::Yesterday,
                Quadrant::Today,
                Quadrant::Tomorrow,
                Quadrant::Week,
            ],
            Self::Time => [
                Quadrant::Morning,
                Quadrant::Afternoon,
                Quadrant::Evening,
                Quadrant::Night,
            ],
        }
    }
}

impl fmt::Display for QuadrantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuadrantMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownMode(s.to_string()))
    }
}

/// A quadrant id. Each mode owns four of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    UrgentImportant,
    UrgentNotImportant,
    NotUrgentImportant,
    NotUrgentNotImportant,
    Overdue,
    Ongoing,
    Upcoming,
    Completed,
    Yesterday,
    Today,
    Tomorrow,
    Week,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Quadrant {
    /// Urgency × importance lookup.
    pub fn eisenhower(urgency: Level, importance: Level) -> Self {
        match (urgency.is_high(), importance.is_high()) {
            (true, true) => Self::UrgentImportant,
            (true, false) => Self::UrgentNotImportant,
            (false, true) => Self::NotUrgentImportant,
            (false, false) => Self::NotUrgentNotImportant,
        }
    }

    pub fn mode(&self) -> QuadrantMode {
        match self {
            Self::UrgentImportant
            | Self::UrgentNotImportant
            | Self::NotUrgentImportant
            | Self::NotUrgentNotImportant => QuadrantMode::UrgentImportant,
            Self::Overdue | Self::Ongoing | Self::Upcoming | Self::Completed => {
                QuadrantMode::Status
            }
            Self::Yesterday | Self::Today | Self::Tomorrow | Self::Week => QuadrantMode::Date,
            Self::Morning | Self::Afternoon | Self::Evening | Self::Night => QuadrantMode::Time,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent-important",
            Self::UrgentNotImportant => "urgent-not-important",
            Self::NotUrgentImportant => "not-urgent-important",
            Self::NotUrgentNotImportant => "not-urgent-not-important",
            Self::Overdue => TaskStatus::Overdue.as_str(),
            Self::Ongoing => TaskStatus::Ongoing.as_str(),
            Self::Upcoming => TaskStatus::Upcoming.as_str(),
            Self::Completed => TaskStatus::Completed.as_str(),
            Self::Yesterday => DateBucket::Yesterday.as_str(),
            Self::Today => DateBucket::Today.as_str(),
            Self::Tomorrow => DateBucket::Tomorrow.as_str(),
            Self::Week => DateBucket::Week.as_str(),
            Self::Morning => TimeOfDay::Morning.as_str(),
            Self::Afternoon => TimeOfDay::Afternoon.as_str(),
            Self::Evening => TimeOfDay::Evening.as_str(),
            Self::Night => TimeOfDay::Night.as_str(),
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TaskStatus> for Quadrant {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Overdue => Self::Overdue,
            TaskStatus::Ongoing => Self::Ongoing,
            TaskStatus::Upcoming => Self::Upcoming,
            TaskStatus::Completed => Self::Completed,
        }
    }
}

impl From<DateBucket> for Quadrant {
    fn from(bucket: DateBucket) -> Self {
        match bucket {
            DateBucket::Yesterday => Self::Yesterday,
            DateBucket::Today => Self::Today,
            DateBucket::Tomorrow => Self::Tomorrow,
            DateBucket::Week => Self::Week,
        }
    }
}

impl From<TimeOfDay> for Quadrant {
    fn from(bucket: TimeOfDay) -> Self {
        match bucket {
            TimeOfDay::Morning => Self::Morning,
            TimeOfDay::Afternoon => Self::Afternoon,
            TimeOfDay::Evening => Self::Evening,
            TimeOfDay::Night => Self::Night,
        }
    }
}

/// Where undated tasks go in the `date` mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UndatedPolicy {
    /// Treat as due today.
    #[default]
    Today,
    /// Leave out of the date board.
    Exclude,
}

/// Knobs for quadrant assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantPolicy {
    pub undated: UndatedPolicy,
    pub day_parts: DayParts,
    pub durations: DurationPolicy,
}

/// One column of a [`QuadrantBoard`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuadrantColumn {
    pub quadrant: Quadrant,
    pub task_ids: Vec<String>,
}

/// Tasks grouped into the four quadrants of one mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuadrantBoard {
    pub mode: QuadrantMode,
    pub columns: Vec<QuadrantColumn>,
    /// Tasks with no quadrant in this mode (only under `UndatedPolicy::Exclude`).
    pub unassigned: Vec<String>,
}

impl QuadrantBoard {
    pub fn column(&self, quadrant: Quadrant) -> Option<&QuadrantColumn> {
        self.columns.iter().find(|c| c.quadrant == quadrant)
    }
}

/// Maps a task and mode to its quadrant.
#[derive(Debug, Clone, Default)]
pub struct QuadrantAssigner {
    policy: QuadrantPolicy,
}

impl QuadrantAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if the day-part boundaries are not increasing or a
    /// duration is not positive.
    pub fn with_policy(policy: QuadrantPolicy) -> Result<Self, ValidationError> {
        policy.day_parts.validate()?;
        policy.durations.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &QuadrantPolicy {
        &self.policy
    }

    /// Quadrant of `task` in `mode`. `now` supplies both the status clock
    /// and "today" for the date mode.
    pub fn assign(&self, task: &Task, mode: QuadrantMode, now: NaiveDateTime) -> Option<Quadrant> {
        match mode {
            QuadrantMode::UrgentImportant => {
                Some(Quadrant::eisenhower(task.urgency, task.importance))
            }
            QuadrantMode::Status => {
                Some(classify_with(task, now, &self.policy.durations).into())
            }
            QuadrantMode::Date => match task.due_date {
                Some(due) => Some(DateBucket::for_dates(due, now.date()).into()),
                None => match self.policy.undated {
                    UndatedPolicy::Today => Some(Quadrant::Today),
                    UndatedPolicy::Exclude => None,
                },
            },
            QuadrantMode::Time => Some(self.policy.day_parts.bucket_for_task(task).into()),
        }
    }

    /// Like [`assign`](Self::assign) with the mode given by its id.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownMode`] for an unrecognised id.
    pub fn quadrant_for(
        &self,
        task: &Task,
        mode: &str,
        now: NaiveDateTime,
    ) -> Result<Option<Quadrant>, ValidationError> {
        Ok(self.assign(task, mode.parse()?, now))
    }

    /// Quadrant of `task` in every mode, in [`QuadrantMode::ALL`] order.
    pub fn assign_all(
        &self,
        task: &Task,
        now: NaiveDateTime,
    ) -> [(QuadrantMode, Option<Quadrant>); 4] {
        QuadrantMode::ALL.map(|mode| (mode, self.assign(task, mode, now)))
    }

    /// Group tasks into the mode's columns, keeping input order in each column.
    pub fn board(&self, tasks: &[Task], mode: QuadrantMode, now: NaiveDateTime) -> QuadrantBoard {
        let mut columns: Vec<QuadrantColumn> = mode
            .quadrants()
            .into_iter()
            .map(|quadrant| QuadrantColumn {
                quadrant,
                task_ids: Vec::new(),
            })
            .collect();
        let mut unassigned = Vec::new();

        for task in tasks {
            match self.assign(task, mode, now) {
                Some(q) => {
                    if let Some(col) = columns.iter_mut().find(|c| c.quadrant == q) {
                        col.task_ids.push(task.id.clone());
                    }
                }
                None => unassigned.push(task.id.clone()),
            }
        }

        QuadrantBoard {
            mode,
            columns,
            unassigned,
        }
    }
}
