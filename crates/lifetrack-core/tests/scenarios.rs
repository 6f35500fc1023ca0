//! End-to-end scenarios through a configured engine.

use chrono::{NaiveDate, NaiveDateTime};
use lifetrack_core::{
    Config, Engine, FixedClock, LatestPass, Level, Quadrant, QuadrantMode, Task, TaskStatus,
    TickInterval, Ticker, TimeOfDay,
};

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
fn urgent_meeting_in_progress() {
    let task = timed("review", "09:00", "10:30")
        .with_urgency(Level::High)
        .with_importance(Level::High);
    let engine = Engine::default();
    let pass = engine.pass(&FixedClock::new(at(9, 45)));

    assert_eq!(pass.status(&task), TaskStatus::Ongoing);
    assert_eq!(pass.remaining_minutes(&task), Some(45));

    let all = pass.assign_all(&task);
    assert_eq!(all[0], (QuadrantMode::UrgentImportant, Some(Quadrant::UrgentImportant)));
    assert_eq!(all[1], (QuadrantMode::Status, Some(Quadrant::Ongoing)));
    assert_eq!(all[2], (QuadrantMode::Date, Some(Quadrant::Today)));
    assert_eq!(all[3], (QuadrantMode::Time, Some(Quadrant::Morning)));

    let layout = pass.layout(std::slice::from_ref(&task), day(), false);
    let bar = layout.bar("review").unwrap();
    assert_eq!(bar.top_offset, 540.0);
    assert_eq!(bar.height, 90.0);
    assert_eq!(bar.remaining_minutes, Some(45));
}

#[test]
fn overlapping_meetings_conflict_with_each_other() {
    let tasks = vec![timed("a", "09:00", "10:00"), timed("b", "09:30", "10:30")];
    let engine = Engine::default();
    let pass = engine.pass_at(at(8, 0));

    let editing_a = engine
        .resolver()
        .candidate_range(day(), "09:00", Some("10:00"))
        .unwrap();
    let conflicts = pass.conflicts(&tasks, day(), &editing_a, Some("a"));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].task_id, "b");

    let editing_b = engine
        .resolver()
        .candidate_range(day(), "09:30", Some("10:30"))
        .unwrap();
    let conflicts = pass.conflicts(&tasks, day(), &editing_b, Some("b"));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].task_id, "a");

    assert_eq!(
        engine.resolver().conflict_pairs(&tasks, day()),
        vec![("a".to_string(), "b".to_string())]
    );
}

#[test]
fn late_night_shift_spans_midnight() {
    let task = timed("shift", "23:00", "01:00");
    let engine = Engine::default();

    let before = engine.pass_at(at(22, 0));
    assert_eq!(before.status(&task), TaskStatus::Upcoming);

    let during = engine.pass_at(day().succ_opt().unwrap().and_hms_opt(0, 15, 0).unwrap());
    assert_eq!(during.status(&task), TaskStatus::Ongoing);
    assert_eq!(during.remaining_minutes(&task), Some(45));

    let after = engine.pass_at(day().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap());
    assert_eq!(after.status(&task), TaskStatus::Overdue);
}

#[test]
fn configured_engine_excludes_undated_tasks_from_date_board() {
    let mut config = Config::default();
    config.apply("quadrants.undated", "exclude").unwrap();
    config.apply("day_parts.evening", "18").unwrap();
    let engine = config.engine().unwrap();

    let tasks = vec![
        Task::new("someday", "Someday").with_time_of_day(TimeOfDay::Night),
        timed("dinner", "17:30", "18:30"),
    ];
    let pass = engine.pass_at(at(12, 0));

    let board = pass.board(&tasks, QuadrantMode::Date);
    assert_eq!(board.unassigned, vec!["someday".to_string()]);
    assert_eq!(
        board.column(Quadrant::Today).unwrap().task_ids,
        vec!["dinner".to_string()]
    );

    // 17:30 is still afternoon with evening moved to 18:00
    assert_eq!(pass.quadrant(&tasks[1], QuadrantMode::Time), Some(Quadrant::Afternoon));
    assert_eq!(pass.quadrant(&tasks[0], QuadrantMode::Time), Some(Quadrant::Night));
}

#[test]
fn ticking_clock_moves_status_forward() {
    let tasks = vec![timed("focus", "09:00", "09:01")];
    let engine = Engine::default();
    let mut ticker = Ticker::new(FixedClock::new(at(8, 59)), TickInterval::from_secs(30));

    let statuses: Vec<TaskStatus> = (0..5)
        .map(|_| engine.pass_at(ticker.tick()).report(&tasks)[0].status)
        .collect();

    assert_eq!(
        statuses,
        vec![
            TaskStatus::Upcoming,
            TaskStatus::Ongoing,
            TaskStatus::Ongoing,
            TaskStatus::Overdue,
            TaskStatus::Overdue,
        ]
    );
    assert_eq!(ticker.ticks(), 5);
}

#[test]
fn passes_finishing_out_of_order_keep_the_newest() {
    let tasks = vec![timed("focus", "09:00", "10:00")];
    let engine = Engine::default();
    let latest = LatestPass::new();

    // Later passes are started first so older results tend to land last.
    let passes: Vec<_> = [at(8, 0), at(9, 0), at(9, 30), at(10, 0)]
        .into_iter()
        .map(|now| engine.pass_at(now))
        .collect();
    std::thread::scope(|scope| {
        for pass in passes.into_iter().rev() {
            let (latest, tasks) = (&latest, &tasks);
            scope.spawn(move || {
                latest.publish(pass.seq(), pass.report(tasks));
            });
        }
    });

    assert_eq!(latest.seq(), Some(4));
    assert_eq!(latest.get().unwrap()[0].status, TaskStatus::Overdue);
    assert!(!latest.publish(2, Vec::new()));
    assert_eq!(latest.seq(), Some(4));
}

#[test]
fn compact_day_with_a_single_meeting() {
    let mut config = Config::default();
    config.apply("timeline.compact_hour_height", "10").unwrap();
    let engine = config.engine().unwrap();

    let tasks = vec![timed("standup", "10:00", "10:15")];
    let layout = engine.pass_at(at(9, 0)).layout(&tasks, day(), true);

    // 23 empty hours at 10 plus one full hour
    assert_eq!(layout.total_height, 23.0 * 10.0 + 60.0);
    let bar = layout.bar("standup").unwrap();
    assert_eq!(bar.top_offset, 100.0);
    assert_eq!(bar.height, 15.0);
    assert_eq!(layout.now_offset, Some(90.0));
}

#[test]
fn task_at_calendar_edge_does_not_block_the_day() {
    let far: Task =
        serde_json::from_str(r#"{"id":"far","title":"Far","due_date":"+262142-12-31","due_time":"23:00"}"#)
            .unwrap();
    let far_date = far.due_date.unwrap();
    let tasks = vec![timed("a", "09:00", "10:00"), far];
    let engine = Engine::default();
    let pass = engine.pass_at(at(9, 30));

    let report = pass.report(&tasks);
    assert_eq!(report[0].status, TaskStatus::Ongoing);
    assert_eq!(report[1].status, TaskStatus::Upcoming);

    assert_eq!(pass.layout(&tasks, day(), false).bars.len(), 1);
    let far_layout = pass.layout(&tasks, far_date, false);
    assert!(far_layout.bars.is_empty());
    assert_eq!(far_layout.untimed, vec!["far".to_string()]);
    assert!(pass.busy_slots(&tasks, far_date, None).is_empty());
}

#[test]
fn oversized_duration_is_rejected_before_any_pass() {
    let mut config = Config::default();
    assert!(config.apply("durations.default_minutes", "1000000000000").is_err());
    assert_eq!(config, Config::default());

    let open = Task::new("open", "Open").with_due_date(day()).with_due_time("09:00");
    let engine = config.engine().unwrap();
    let pass = engine.pass_at(at(10, 0));
    assert_eq!(pass.status(&open), TaskStatus::Ongoing);
}
