//! Busy slot lookup for scheduling conflicts.
//!
//! A busy slot is the interval an existing timed task occupies on a day.
//! All-day and undated tasks never block a slot.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;
use crate::task::{parse_clock_time, DurationPolicy, Task, TaskWindow, TimeRange};

/// An existing task's interval on a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusySlot {
    pub task_id: String,
    pub title: String,
    #[serde(flatten)]
    range: TimeRange,
}

impl BusySlot {
    pub fn start(&self) -> chrono::NaiveDateTime {
        self.range.start()
    }

    pub fn end(&self) -> chrono::NaiveDateTime {
        self.range.end()
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn conflicts_with(&self, candidate: &TimeRange) -> bool {
        self.range.overlaps(candidate)
    }
}

/// Resolver for the busy slots of a day.
#[derive(Debug, Clone, Default)]
pub struct BusySlotResolver {
    durations: DurationPolicy,
}

impl BusySlotResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durations(mut self, durations: DurationPolicy) -> Self {
        self.durations = durations;
        self
    }

    /// Timed tasks due on `date`, sorted by start. `exclude` skips the task
    /// being edited so it does not conflict with itself.
    pub fn busy_slots(&self, tasks: &[Task], date: NaiveDate, exclude: Option<&str>) -> Vec<BusySlot> {
        let mut slots: Vec<BusySlot> = tasks
            .iter()
            .filter(|t| t.due_date == Some(date))
            .filter(|t| exclude != Some(t.id.as_str()))
            .filter_map(|t| {
                let range = TaskWindow::resolve_with(t, &self.durations).timed_range()?;
                Some(BusySlot {
                    task_id: t.id.clone(),
                    title: t.title.clone(),
                    range,
                })
            })
            .collect();

        slots.sort_by_key(|s| s.start());
        slots
    }

    /// Busy slots on `date` that overlap `candidate`.
    pub fn conflicts(
        &self,
        tasks: &[Task],
        date: NaiveDate,
        candidate: &TimeRange,
        exclude: Option<&str>,
    ) -> Vec<BusySlot> {
        let conflicts: Vec<BusySlot> = self
            .busy_slots(tasks, date, exclude)
            .into_iter()
            .filter(|slot| slot.conflicts_with(candidate))
            .collect();

        if !conflicts.is_empty() {
            tracing::debug!(
                "{} conflict(s) for {} - {}",
                conflicts.len(),
                candidate.start(),
                candidate.end()
            );
        }
        conflicts
    }

    /// Every pair of overlapping busy slots on `date`, by task id, earlier
    /// slot first.
    pub fn conflict_pairs(&self, tasks: &[Task], date: NaiveDate) -> Vec<(String, String)> {
        let slots = self.busy_slots(tasks, date, None);
        let mut pairs = Vec::new();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                if a.range.overlaps(&b.range) {
                    pairs.push((a.task_id.clone(), b.task_id.clone()));
                }
            }
        }
        pairs
    }

    /// Build a candidate range from user-entered times. Unlike stored task
    /// data, malformed input here is an error.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidTimeOfDay`] if either time does not
    /// parse, or [`ValidationError::DateOutOfRange`] if the range would end
    /// past the last representable date.
    pub fn candidate_range(
        &self,
        date: NaiveDate,
        start: &str,
        end: Option<&str>,
    ) -> Result<TimeRange, ValidationError> {
        let start_time =
            parse_clock_time(start).ok_or_else(|| ValidationError::InvalidTimeOfDay(start.into()))?;
        let end_time = end
            .map(|raw| parse_clock_time(raw).ok_or_else(|| ValidationError::InvalidTimeOfDay(raw.into())))
            .transpose()?;
        TimeRange::on_date(date, start_time, end_time, &self.durations)
            .ok_or(ValidationError::DateOutOfRange(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn timed(id: &str, start: &str, end: &str) -> Task {
        Task::new(id, format!("Task {id}"))
            .with_due_date(day())
            .with_due_time(start)
            .with_end_time(end)
    }

    #[test]
    fn overlapping_tasks_conflict_both_ways() {
        let tasks = vec![timed("a", "09:00", "10:00"), timed("b", "09:30", "10:30")];
        let resolver = BusySlotResolver::new();

        let slots = resolver.busy_slots(&tasks, day(), None);
        assert_eq!(slots.len(), 2);
        let (a, b) = (&slots[0], &slots[1]);
        assert!(a.conflicts_with(b.range()));
        assert!(b.conflicts_with(a.range()));

        let pairs = resolver.conflict_pairs(&tasks, day());
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string())]);
    }

    #[test]
    fn candidate_conflicts_exclude_the_edited_task() {
        let tasks = vec![timed("a", "09:00", "10:00"), timed("b", "09:30", "10:30")];
        let resolver = BusySlotResolver::new();
        let candidate = resolver
            .candidate_range(day(), "09:15", Some("09:45"))
            .unwrap();

        let all = resolver.conflicts(&tasks, day(), &candidate, None);
        assert_eq!(all.len(), 2);

        let others = resolver.conflicts(&tasks, day(), &candidate, Some("a"));
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].task_id, "b");
    }

    #[test]
    fn touching_slots_do_not_conflict() {
        let tasks = vec![timed("a", "09:00", "10:00")];
        let resolver = BusySlotResolver::new();
        let candidate = resolver
            .candidate_range(day(), "10:00", Some("11:00"))
            .unwrap();
        assert!(resolver.conflicts(&tasks, day(), &candidate, None).is_empty());
    }

    #[test]
    fn midnight_wrap_blocks_late_candidates() {
        let tasks = vec![timed("late", "23:00", "01:00")];
        let resolver = BusySlotResolver::new();
        let candidate = resolver
            .candidate_range(day(), "23:30", Some("00:30"))
            .unwrap();
        assert_eq!(candidate.duration_minutes(), 60);
        assert_eq!(resolver.conflicts(&tasks, day(), &candidate, None).len(), 1);
    }

    #[test]
    fn untimed_and_other_days_are_free() {
        let tasks = vec![
            Task::new("all-day", "Holiday").with_due_date(day()),
            timed("tomorrow", "09:00", "10:00").with_due_date(day().succ_opt().unwrap()),
            Task::new("undated", "Whenever").with_due_time("09:00"),
        ];
        assert!(BusySlotResolver::new().busy_slots(&tasks, day(), None).is_empty());
    }

    #[test]
    fn slots_are_sorted_by_start() {
        let tasks = vec![
            timed("c", "15:00", "16:00"),
            timed("a", "08:00", "09:00"),
            timed("b", "11:00", "12:00"),
        ];
        let ids: Vec<_> = BusySlotResolver::new()
            .busy_slots(&tasks, day(), None)
            .into_iter()
            .map(|s| s.task_id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_candidate_is_an_error() {
        let resolver = BusySlotResolver::new();
        assert_eq!(
            resolver.candidate_range(day(), "9am", None),
            Err(ValidationError::InvalidTimeOfDay("9am".into()))
        );
        assert!(resolver.candidate_range(day(), "09:00", Some("soon")).is_err());
    }

    #[test]
    fn candidate_at_calendar_edge_is_an_error() {
        let last = NaiveDate::MAX;
        assert_eq!(
            BusySlotResolver::new().candidate_range(last, "23:00", None),
            Err(ValidationError::DateOutOfRange(last))
        );
    }

    #[test]
    fn candidate_without_end_uses_default_length() {
        let range = BusySlotResolver::new()
            .candidate_range(day(), "14:00", None)
            .unwrap();
        assert_eq!(range.duration_minutes(), 120);
    }

    #[test]
    fn slot_serializes_flat() {
        let tasks = vec![timed("a", "09:00", "10:00")];
        let slot = &BusySlotResolver::new().busy_slots(&tasks, day(), None)[0];
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(json["start"], "2024-03-01T09:00:00");
        assert_eq!(json["end"], "2024-03-01T10:00:00");
        assert_eq!(json["title"], "Task a");
    }
}
