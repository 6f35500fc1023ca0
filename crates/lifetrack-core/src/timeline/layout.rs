//! Day timeline layout.
//!
//! Two passes over the day's tasks: first find which hours hold a task so
//! compact mode can shrink the rest, then position every bar through the
//! resulting [`HourGrid`]. Concurrent tasks are not split into lanes; each
//! bar only lists the ids it overlaps so the renderer can decide.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::rows::{minute_of_day, HourGrid, HourRow, TimelineMetrics};
use crate::error::ValidationError;
use crate::status::{classify_with, remaining_minutes_with, TaskStatus};
use crate::task::{DurationPolicy, Priority, Task, TaskWindow, TimeRange};

/// A positioned task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBar {
    pub task_id: String,
    pub title: String,
    pub priority: Priority,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub top_offset: f64,
    pub height: f64,
    pub status: TaskStatus,
    /// Only present while the task is ongoing.
    pub remaining_minutes: Option<i64>,
    /// Ids of other bars on this day whose interval overlaps this one.
    pub overlaps_with: Vec<String>,
}

/// Everything the renderer needs for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub day: NaiveDate,
    pub compact: bool,
    pub rows: Vec<HourRow>,
    /// Sorted by start time; ties keep input order.
    pub bars: Vec<TaskBar>,
    /// Tasks due on the day that have no time window to draw.
    pub untimed: Vec<String>,
    /// Position of the "now" line, when now falls on this day.
    pub now_offset: Option<f64>,
    pub total_height: f64,
}

impl DayLayout {
    pub fn bar(&self, task_id: &str) -> Option<&TaskBar> {
        self.bars.iter().find(|b| b.task_id == task_id)
    }
}

/// Lays out one day of tasks on 24 hour rows.
#[derive(Debug, Clone, Default)]
pub struct TimelineLayoutEngine {
    metrics: TimelineMetrics,
    durations: DurationPolicy,
}

impl TimelineLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if the metrics are invalid.
    pub fn with_metrics(mut self, metrics: TimelineMetrics) -> Result<Self, ValidationError> {
        metrics.validate()?;
        self.metrics = metrics;
        Ok(self)
    }

    pub fn with_durations(mut self, durations: DurationPolicy) -> Self {
        self.durations = durations;
        self
    }

    pub fn metrics(&self) -> &TimelineMetrics {
        &self.metrics
    }

    /// Lay out the tasks due on `day`. Tasks due on other days are ignored.
    pub fn layout(
        &self,
        tasks: &[Task],
        day: NaiveDate,
        now: NaiveDateTime,
        compact: bool,
    ) -> DayLayout {
        let day_start = day.and_time(NaiveTime::MIN);

        let mut placed: Vec<(&Task, TimeRange)> = Vec::new();
        let mut untimed = Vec::new();
        for task in tasks.iter().filter(|t| t.due_date == Some(day)) {
            match TaskWindow::resolve_with(task, &self.durations).timed_range() {
                Some(range) => placed.push((task, range)),
                None => untimed.push(task.id.clone()),
            }
        }
        // sort_by_key is stable
        placed.sort_by_key(|(_, range)| range.start());

        let spans: Vec<(f64, f64)> = placed
            .iter()
            .map(|(_, range)| {
                (
                    minute_of_day(day_start, range.start()),
                    minute_of_day(day_start, range.end()),
                )
            })
            .collect();
        let grid = HourGrid::build(&spans, compact, &self.metrics);

        let bars = placed
            .iter()
            .zip(&spans)
            .enumerate()
            .map(|(idx, ((task, range), &(start_min, end_min)))| {
                let top_offset = grid.offset_at(start_min);
                let overlaps_with = placed
                    .iter()
                    .enumerate()
                    .filter(|(other_idx, (_, other))| *other_idx != idx && range.overlaps(other))
                    .map(|(_, (other, _))| other.id.clone())
                    .collect();

                TaskBar {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    priority: task.priority,
                    start: range.start(),
                    end: range.end(),
                    top_offset,
                    height: grid.offset_at(end_min) - top_offset,
                    status: classify_with(task, now, &self.durations),
                    remaining_minutes: remaining_minutes_with(task, now, &self.durations),
                    overlaps_with,
                }
            })
            .collect::<Vec<_>>();

        let now_offset =
            (now.date() == day).then(|| grid.offset_at(minute_of_day(day_start, now)));

        tracing::debug!(
            "timeline {} (now {}): {} bars, {} untimed, compact={}",
            day,
            now,
            bars.len(),
            untimed.len(),
            compact
        );

        DayLayout {
            day,
            compact,
            rows: grid.rows(),
            bars,
            untimed,
            now_offset,
            total_height: grid.total_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn timed(id: &str, start: &str, end: &str) -> Task {
        Task::new(id, id)
            .with_due_date(day())
            .with_due_time(start)
            .with_end_time(end)
    }

    #[test]
    fn normal_mode_positions_are_proportional() {
        let tasks = vec![timed("a", "09:00", "10:30")];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(9, 45), false);

        let bar = layout.bar("a").unwrap();
        assert_eq!(bar.top_offset, 540.0);
        assert_eq!(bar.height, 90.0);
        assert_eq!(bar.status, TaskStatus::Ongoing);
        assert_eq!(bar.remaining_minutes, Some(45));
        assert_eq!(layout.now_offset, Some(585.0));
        assert_eq!(layout.total_height, 1440.0);
    }

    #[test]
    fn compact_mode_uses_cumulative_offsets() {
        let tasks = vec![timed("a", "09:00", "10:30")];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(12, 0), true);

        let bar = layout.bar("a").unwrap();
        assert_eq!(bar.top_offset, 180.0);
        // hour 9 full (60) + half of hour 10 (30)
        assert_eq!(bar.height, 90.0);
        // 9 compact rows + 2 full rows + 1 compact row (11:00)
        assert_eq!(layout.now_offset, Some(180.0 + 120.0 + 20.0));
        assert_eq!(bar.remaining_minutes, None);
        assert_eq!(bar.status, TaskStatus::Overdue);
    }

    #[test]
    fn bars_sorted_by_start_with_stable_ties() {
        let tasks = vec![
            timed("late", "15:00", "16:00"),
            timed("tie-1", "08:00", "09:00"),
            timed("tie-2", "08:00", "08:30"),
        ];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(7, 0), false);
        let ids: Vec<_> = layout.bars.iter().map(|b| b.task_id.as_str()).collect();
        assert_eq!(ids, vec!["tie-1", "tie-2", "late"]);
    }

    #[test]
    fn overlapping_bars_are_annotated_not_reflowed() {
        let tasks = vec![timed("a", "09:00", "10:00"), timed("b", "09:30", "10:30")];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(7, 0), false);

        let a = layout.bar("a").unwrap();
        let b = layout.bar("b").unwrap();
        assert_eq!(a.overlaps_with, vec!["b".to_string()]);
        assert_eq!(b.overlaps_with, vec!["a".to_string()]);
        assert!(b.top_offset > a.top_offset);
        assert!(b.top_offset < a.top_offset + a.height);
    }

    #[test]
    fn untimed_and_other_days_are_not_drawn() {
        let tasks = vec![
            Task::new("all-day", "Birthday").with_due_date(day()),
            timed("tomorrow", "09:00", "10:00").with_due_date(day().succ_opt().unwrap()),
            Task::new("undated", "Someday").with_due_time("09:00"),
        ];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(7, 0), false);
        assert!(layout.bars.is_empty());
        assert_eq!(layout.untimed, vec!["all-day".to_string()]);
    }

    #[test]
    fn midnight_wrap_is_clipped_to_the_day() {
        let tasks = vec![timed("late", "23:00", "01:00")];
        let layout = TimelineLayoutEngine::new().layout(&tasks, day(), at(7, 0), false);
        let bar = layout.bar("late").unwrap();
        assert_eq!(bar.top_offset, 1380.0);
        assert_eq!(bar.height, 60.0);
        assert_eq!(bar.end, day().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn now_line_absent_on_other_days() {
        let layout = TimelineLayoutEngine::new().layout(
            &[],
            day(),
            day().succ_opt().unwrap().and_hms_opt(9, 0, 0).unwrap(),
            false,
        );
        assert_eq!(layout.now_offset, None);
        assert_eq!(layout.rows.len(), 24);
    }

    #[test]
    fn compact_day_is_shorter_when_rows_are_empty() {
        let tasks = vec![timed("a", "09:00", "10:00")];
        let engine = TimelineLayoutEngine::new();
        let normal = engine.layout(&tasks, day(), at(7, 0), false);
        let compact = engine.layout(&tasks, day(), at(7, 0), true);
        assert!(compact.total_height < normal.total_height);
    }

    #[test]
    fn rejects_invalid_metrics() {
        let result = TimelineLayoutEngine::new().with_metrics(TimelineMetrics {
            hour_height: 20.0,
            compact_hour_height: 40.0,
        });
        assert!(result.is_err());
    }
}
