//! Time-window resolution for a task's raw date and time fields.
//!
//! Rules applied here, in one place, so every component agrees on them:
//! - `due_time` without `due_date` is ignored.
//! - A malformed `HH:MM` string is treated as absent.
//! - A missing `end_time` means `due_time + default_minutes`.
//! - An `end_time` earlier than the start crosses midnight.
//! - A zero-length result falls back to `min_minutes`.
//! - A window that cannot be represented (dates at the edge of the
//!   calendar) leaves the task unscheduled.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Task;
use crate::error::ValidationError;

/// Parse a local time of day in `HH:MM` form.
///
/// `HH:MM:SS` is accepted too since some backends store time columns with
/// seconds; the seconds are kept.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Upper bound for `min_minutes`: one day.
pub const MAX_MIN_MINUTES: i64 = 24 * 60;
/// Upper bound for `default_minutes`: one week.
pub const MAX_DEFAULT_MINUTES: i64 = 7 * 24 * 60;

/// Durations used when a task's end cannot be taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationPolicy {
    /// Length of a task with a start but no (usable) end.
    pub default_minutes: i64,
    /// Length substituted for a zero-length window.
    pub min_minutes: i64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            default_minutes: 120,
            min_minutes: 30,
        }
    }
}

impl DurationPolicy {
    pub fn new(default_minutes: i64, min_minutes: i64) -> Result<Self, ValidationError> {
        let policy = Self {
            default_minutes,
            min_minutes,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// # Errors
    /// `default_minutes` must lie in `1..=MAX_DEFAULT_MINUTES` and
    /// `min_minutes` in `1..=MAX_MIN_MINUTES`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_minutes("default_minutes", self.default_minutes, MAX_DEFAULT_MINUTES)?;
        check_minutes("min_minutes", self.min_minutes, MAX_MIN_MINUTES)
    }

    /// Resolve the end of a window that starts at `start`.
    ///
    /// The result is always strictly after `start`. `None` if it would fall
    /// outside the representable calendar.
    pub fn resolve_end(&self, start: NaiveDateTime, end: Option<NaiveTime>) -> Option<NaiveDateTime> {
        let Some(end_time) = end else {
            return add_minutes(start, self.default_minutes);
        };

        let mut end = start.date().and_time(end_time);
        if end < start {
            end = end.checked_add_signed(Duration::days(1))?;
        }
        if end <= start {
            add_minutes(start, self.min_minutes)
        } else {
            Some(end)
        }
    }
}

fn check_minutes(field: &str, value: i64, max: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: "must be positive".into(),
        });
    }
    if value > max {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("must be at most {max}"),
        });
    }
    Ok(())
}

/// `start + minutes`, with at least one minute added.
fn add_minutes(start: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    start.checked_add_signed(Duration::try_minutes(minutes.max(1))?)
}

/// Half-open interval `[start, end)` of local date-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// # Errors
    /// Returns an error if `end <= start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range on `date` from a start time and optional end time,
    /// applying the wrap and default rules of `policy`. `None` if the end
    /// is past the last representable date.
    pub fn on_date(
        date: NaiveDate,
        start: NaiveTime,
        end: Option<NaiveTime>,
        policy: &DurationPolicy,
    ) -> Option<Self> {
        let start = date.and_time(start);
        let end = policy.resolve_end(start, end)?;
        Some(Self { start, end })
    }

    /// The whole calendar day `[date 00:00, date+1 00:00)`. `None` on the
    /// last representable date.
    pub fn whole_day(date: NaiveDate) -> Option<Self> {
        let start = date.and_time(NaiveTime::MIN);
        let end = date.succ_opt()?.and_time(NaiveTime::MIN);
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// `start <= at < end`
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }

    /// Half-open overlap test. Touching intervals do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ValidationError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

/// A task's time attributes resolved into an explicit shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskWindow {
    /// No due date. Never placed on a timeline.
    Unscheduled,
    /// Due date without any usable time field.
    AllDay { date: NaiveDate },
    /// Due date with a start and/or end time.
    Timed { date: NaiveDate, range: TimeRange },
}

impl TaskWindow {
    /// Resolve with the default [`DurationPolicy`].
    pub fn resolve(task: &Task) -> Self {
        Self::resolve_with(task, &DurationPolicy::default())
    }

    pub fn resolve_with(task: &Task, policy: &DurationPolicy) -> Self {
        let Some(date) = task.due_date else {
            return TaskWindow::Unscheduled;
        };

        let due = parse_field(task, "due_time", task.due_time.as_deref());
        let end = parse_field(task, "end_time", task.end_time.as_deref());

        let window = match (due, end) {
            (None, None) => TimeRange::whole_day(date).map(|_| TaskWindow::AllDay { date }),
            (start, end) => TimeRange::on_date(date, start.unwrap_or(NaiveTime::MIN), end, policy)
                .map(|range| TaskWindow::Timed { date, range }),
        };
        window.unwrap_or_else(|| {
            tracing::warn!(
                "task {}: window on {} is out of range, treating as unscheduled",
                task.id,
                date
            );
            TaskWindow::Unscheduled
        })
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TaskWindow::Unscheduled => None,
            TaskWindow::AllDay { date } | TaskWindow::Timed { date, .. } => Some(*date),
        }
    }

    /// The interval the task occupies; all-day tasks span their whole date.
    pub fn span(&self) -> Option<TimeRange> {
        match self {
            TaskWindow::Unscheduled => None,
            TaskWindow::AllDay { date } => TimeRange::whole_day(*date),
            TaskWindow::Timed { range, .. } => Some(*range),
        }
    }

    /// Only timed windows have a range worth drawing or conflicting with.
    pub fn timed_range(&self) -> Option<TimeRange> {
        match self {
            TaskWindow::Timed { range, .. } => Some(*range),
            _ => None,
        }
    }
}

fn parse_field(task: &Task, field: &str, raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_clock_time(raw);
    if parsed.is_none() {
        tracing::warn!(
            "task {}: malformed {} {:?}, treating as absent",
            task.id,
            field,
            raw
        );
    }
    parsed
}
