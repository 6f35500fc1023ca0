//! Bucket rules for the `date` and `time` quadrant modes.

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::task::{parse_clock_time, Task, TimeOfDay};

/// Day-difference bucket relative to today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    /// Any date before today
    Yesterday,
    Today,
    Tomorrow,
    /// Two or more days out
    Week,
}

impl DateBucket {
    /// `diff` is `due_date - today` in whole days.
    pub fn from_day_diff(diff: i64) -> Self {
        match diff {
            d if d < 0 => Self::Yesterday,
            0 => Self::Today,
            1 => Self::Tomorrow,
            _ => Self::Week,
        }
    }

    pub fn for_dates(due: NaiveDate, today: NaiveDate) -> Self {
        Self::from_day_diff((due - today).num_days())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yesterday => "yesterday",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Week => "week",
        }
    }
}

/// Starting hour of each part of the day. Hours outside
/// `[morning, night)` belong to the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayParts {
    #[serde(default = "default_morning")]
    pub morning: u32,
    #[serde(default = "default_afternoon")]
    pub afternoon: u32,
    #[serde(default = "default_evening")]
    pub evening: u32,
    #[serde(default = "default_night")]
    pub night: u32,
}

fn default_morning() -> u32 {
    5
}
fn default_afternoon() -> u32 {
    12
}
fn default_evening() -> u32 {
    17
}
fn default_night() -> u32 {
    21
}

impl Default for DayParts {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            afternoon: default_afternoon(),
            evening: default_evening(),
            night: default_night(),
        }
    }
}

impl DayParts {
    /// # Errors
    /// Boundaries must be strictly increasing and below 24.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ordered = self.morning < self.afternoon
            && self.afternoon < self.evening
            && self.evening < self.night
            && self.night < 24;
        if ordered {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: "day_parts".into(),
                message: format!(
                    "boundaries must increase within 0..24, got {}/{}/{}/{}",
                    self.morning, self.afternoon, self.evening, self.night
                ),
            })
        }
    }

    pub fn bucket_for_hour(&self, hour: u32) -> TimeOfDay {
        if hour >= self.morning && hour < self.afternoon {
            TimeOfDay::Morning
        } else if hour >= self.afternoon && hour < self.evening {
            TimeOfDay::Afternoon
        } else if hour >= self.evening && hour < self.night {
            TimeOfDay::Evening
        } else {
            TimeOfDay::Night
        }
    }

    /// Bucket from `due_time`, or the task's stored bucket when the time is
    /// missing, malformed, or has no date to anchor it.
    pub fn bucket_for_task(&self, task: &Task) -> TimeOfDay {
        if task.due_date.is_none() {
            return task.time_of_day;
        }
        task.due_time
            .as_deref()
            .and_then(parse_clock_time)
            .map(|t| self.bucket_for_hour(t.hour()))
            .unwrap_or(task.time_of_day)
    }
}
