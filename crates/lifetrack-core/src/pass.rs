//! Computation passes.
//!
//! A pass captures `now` once and answers every question about a task set
//! with that single value, so status, quadrants, and layout never disagree
//! about the time. Passes are numbered; a consumer holding results from
//! several passes keeps only the newest via [`LatestPass`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::quadrant::{Quadrant, QuadrantAssigner, QuadrantBoard, QuadrantMode, QuadrantPolicy};
use crate::status::{classify_with, remaining_minutes_with, TaskStatus};
use crate::task::{DurationPolicy, Task, TimeRange};
use crate::timeline::{BusySlot, BusySlotResolver, DayLayout, TimelineLayoutEngine, TimelineMetrics};

/// Status line for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub task_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub remaining_minutes: Option<i64>,
}

/// Configured components sharing one duration policy.
#[derive(Debug, Default)]
pub struct Engine {
    assigner: QuadrantAssigner,
    layout: TimelineLayoutEngine,
    busy: BusySlotResolver,
    next_seq: AtomicU64,
}

impl Engine {
    /// # Errors
    /// Returns an error if the day parts or metrics are invalid.
    pub fn new(policy: QuadrantPolicy, metrics: TimelineMetrics) -> Result<Self, ValidationError> {
        let durations = policy.durations;
        Ok(Self {
            assigner: QuadrantAssigner::with_policy(policy)?,
            layout: TimelineLayoutEngine::new()
                .with_metrics(metrics)?
                .with_durations(durations),
            busy: BusySlotResolver::new().with_durations(durations),
            next_seq: AtomicU64::new(0),
        })
    }

    pub fn durations(&self) -> &DurationPolicy {
        &self.assigner.policy().durations
    }

    pub fn assigner(&self) -> &QuadrantAssigner {
        &self.assigner
    }

    pub fn layout_engine(&self) -> &TimelineLayoutEngine {
        &self.layout
    }

    pub fn resolver(&self) -> &BusySlotResolver {
        &self.busy
    }

    /// Start a pass, reading `clock` exactly once.
    pub fn pass<C: Clock + ?Sized>(&self, clock: &C) -> Pass<'_> {
        self.pass_at(clock.now())
    }

    /// Start a pass at an explicit instant.
    pub fn pass_at(&self, now: NaiveDateTime) -> Pass<'_> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("pass {} at {}", seq, now);
        Pass {
            engine: self,
            seq,
            now,
        }
    }
}

/// One computation over a task set with a single captured `now`.
#[derive(Debug, Clone, Copy)]
pub struct Pass<'e> {
    engine: &'e Engine,
    seq: u64,
    now: NaiveDateTime,
}

impl Pass<'_> {
    /// Sequence number, increasing per engine starting at 1.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn status(&self, task: &Task) -> TaskStatus {
        classify_with(task, self.now, self.engine.durations())
    }

    pub fn remaining_minutes(&self, task: &Task) -> Option<i64> {
        remaining_minutes_with(task, self.now, self.engine.durations())
    }

    pub fn report(&self, tasks: &[Task]) -> Vec<StatusReport> {
        tasks
            .iter()
            .map(|task| StatusReport {
                task_id: task.id.clone(),
                title: task.title.clone(),
                status: self.status(task),
                remaining_minutes: self.remaining_minutes(task),
            })
            .collect()
    }

    pub fn quadrant(&self, task: &Task, mode: QuadrantMode) -> Option<Quadrant> {
        self.engine.assigner.assign(task, mode, self.now)
    }

    pub fn assign_all(&self, task: &Task) -> [(QuadrantMode, Option<Quadrant>); 4] {
        self.engine.assigner.assign_all(task, self.now)
    }

    pub fn board(&self, tasks: &[Task], mode: QuadrantMode) -> QuadrantBoard {
        self.engine.assigner.board(tasks, mode, self.now)
    }

    pub fn layout(&self, tasks: &[Task], day: NaiveDate, compact: bool) -> DayLayout {
        self.engine.layout.layout(tasks, day, self.now, compact)
    }

    pub fn busy_slots(&self, tasks: &[Task], date: NaiveDate, exclude: Option<&str>) -> Vec<BusySlot> {
        self.engine.busy.busy_slots(tasks, date, exclude)
    }

    pub fn conflicts(
        &self,
        tasks: &[Task],
        date: NaiveDate,
        candidate: &TimeRange,
        exclude: Option<&str>,
    ) -> Vec<BusySlot> {
        self.engine.busy.conflicts(tasks, date, candidate, exclude)
    }
}

/// Holds the result of the newest pass published so far. Results from
/// older passes that arrive late are dropped.
#[derive(Debug)]
pub struct LatestPass<T> {
    slot: Mutex<Option<(u64, T)>>,
}

impl<T> Default for LatestPass<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestPass<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` if `seq` is newer than what is held. Returns whether it
    /// was stored.
    pub fn publish(&self, seq: u64, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some((held, _)) if *held >= seq => {
                tracing::debug!("dropping stale pass {} (holding {})", seq, held);
                false
            }
            _ => {
                *slot = Some((seq, value));
                true
            }
        }
    }

    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|(_, value)| value.clone())
    }

    pub fn seq(&self) -> Option<u64> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|(seq, _)| *seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::task::Level;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 45, 0)
            .unwrap()
    }

    fn standup() -> Task {
        Task::new("standup", "Standup")
            .with_due_date(now().date())
            .with_due_time("09:00")
            .with_end_time("10:30")
            .with_urgency(Level::High)
            .with_importance(Level::High)
    }

    /// Counts reads so a test can assert one read per pass.
    struct CountingClock {
        now: NaiveDateTime,
        reads: std::cell::Cell<u32>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> NaiveDateTime {
            self.reads.set(self.reads.get() + 1);
            self.now
        }
    }

    #[test]
    fn pass_reads_the_clock_once() {
        let clock = CountingClock {
            now: now(),
            reads: std::cell::Cell::new(0),
        };
        let engine = Engine::default();
        let pass = engine.pass(&clock);
        let tasks = vec![standup()];

        pass.status(&tasks[0]);
        pass.board(&tasks, QuadrantMode::Status);
        pass.layout(&tasks, pass.today(), false);
        assert_eq!(clock.reads.get(), 1);
    }

    #[test]
    fn pass_answers_are_consistent() {
        let engine = Engine::default();
        let pass = engine.pass(&FixedClock::new(now()));
        let task = standup();

        assert_eq!(pass.status(&task), TaskStatus::Ongoing);
        assert_eq!(pass.remaining_minutes(&task), Some(45));
        assert_eq!(
            pass.quadrant(&task, QuadrantMode::UrgentImportant),
            Some(Quadrant::UrgentImportant)
        );
        assert_eq!(pass.quadrant(&task, QuadrantMode::Date), Some(Quadrant::Today));
        assert_eq!(pass.quadrant(&task, QuadrantMode::Status), Some(Quadrant::Ongoing));

        let layout = pass.layout(std::slice::from_ref(&task), pass.today(), false);
        assert_eq!(layout.bar("standup").unwrap().remaining_minutes, Some(45));
    }

    #[test]
    fn report_lists_every_task() {
        let engine = Engine::default();
        let tasks = vec![standup(), Task::new("later", "Someday")];
        let report = engine.pass_at(now()).report(&tasks);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].status, TaskStatus::Ongoing);
        assert_eq!(report[1].status, TaskStatus::Upcoming);
        assert_eq!(report[1].remaining_minutes, None);
    }

    #[test]
    fn sequence_increases() {
        let engine = Engine::default();
        let a = engine.pass_at(now());
        let b = engine.pass_at(now());
        assert_eq!(a.seq(), 1);
        assert_eq!(b.seq(), 2);
    }

    #[test]
    fn latest_pass_rejects_stale_results() {
        let latest = LatestPass::new();
        assert!(latest.get().is_none());
        assert!(latest.publish(2, "second"));
        assert!(!latest.publish(1, "first"));
        assert!(!latest.publish(2, "again"));
        assert_eq!(latest.get(), Some("second"));
        assert!(latest.publish(3, "third"));
        assert_eq!(latest.seq(), Some(3));
    }

    #[test]
    fn engine_rejects_invalid_metrics() {
        let metrics = TimelineMetrics {
            hour_height: 60.0,
            compact_hour_height: 0.0,
        };
        assert!(Engine::new(QuadrantPolicy::default(), metrics).is_err());
    }
}
