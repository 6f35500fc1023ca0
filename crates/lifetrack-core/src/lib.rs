//! # Lifetrack Core Library
//!
//! Temporal classification and scheduling layout for tasks. Given a list of
//! tasks and the current time, the library decides each task's status,
//! groups tasks into quadrants under four classification modes, positions
//! them on a day timeline, and reports busy slots for conflict checks.
//!
//! All computation is pure and synchronous. "Now" is always an explicit
//! argument; the [`Clock`] is the only place wall time is read, and a
//! [`Pass`] reads it once so every answer in the pass agrees.
//!
//! ## Key Components
//!
//! - [`classify`]: overdue / ongoing / upcoming / completed
//! - [`QuadrantAssigner`]: urgent-important, status, date and time modes
//! - [`TimelineLayoutEngine`]: 24 hour rows with optional compaction
//! - [`BusySlotResolver`]: overlapping tasks for a candidate time range
//! - [`Engine`]: the above, configured, behind one `now` per pass
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod error;
pub mod pass;
pub mod quadrant;
pub mod status;
pub mod storage;
pub mod task;
pub mod timeline;

pub use clock::{Clock, FixedClock, SystemClock, TickInterval, Ticker};
pub use error::{ConfigError, CoreError, ValidationError};
pub use pass::{Engine, LatestPass, Pass, StatusReport};
pub use quadrant::{
    Quadrant, QuadrantAssigner, QuadrantBoard, QuadrantMode, QuadrantPolicy, UndatedPolicy,
};
pub use status::{classify, classify_with, remaining_minutes, remaining_minutes_with, TaskStatus};
pub use storage::Config;
pub use task::{DurationPolicy, Level, Priority, Subtask, Task, TaskWindow, TimeOfDay, TimeRange};
pub use timeline::{BusySlot, BusySlotResolver, DayLayout, TaskBar, TimelineLayoutEngine, TimelineMetrics};
