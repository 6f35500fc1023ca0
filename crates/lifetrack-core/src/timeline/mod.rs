//! Day timeline.
//!
//! This module provides:
//! - Hour rows with optional compaction of empty hours
//! - Task bar positioning and the "now" line
//! - Busy slot lookup for scheduling conflicts

mod busy;
mod layout;
mod rows;

pub use busy::{BusySlot, BusySlotResolver};
pub use layout::{DayLayout, TaskBar, TimelineLayoutEngine};
pub use rows::{minute_of_day, HourGrid, HourRow, TimelineMetrics, HOURS_PER_DAY};
