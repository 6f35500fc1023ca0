//! Hour rows and the cumulative offset function shared by bars and the
//! "now" line.
//!
//! Row heights are not uniform in compact mode, so positions always come
//! from prefix sums over the rows, never from minutes × pixels-per-minute.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const HOURS_PER_DAY: usize = 24;
const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Row heights in abstract units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineMetrics {
    /// Height of an hour row that holds a task, or of every row when not compact.
    pub hour_height: f64,
    /// Height of an empty hour row in compact mode.
    pub compact_hour_height: f64,
}

impl Default for TimelineMetrics {
    fn default() -> Self {
        Self {
            hour_height: 60.0,
            compact_hour_height: 20.0,
        }
    }
}

impl TimelineMetrics {
    pub fn new(hour_height: f64, compact_hour_height: f64) -> Result<Self, ValidationError> {
        let metrics = Self {
            hour_height,
            compact_hour_height,
        };
        metrics.validate()?;
        Ok(metrics)
    }

    /// # Errors
    /// Both heights must be finite with `0 < compact_hour_height < hour_height`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.hour_height.is_finite() || self.hour_height <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "hour_height".into(),
                message: format!("must be a positive number, got {}", self.hour_height),
            });
        }
        if !self.compact_hour_height.is_finite()
            || self.compact_hour_height <= 0.0
            || self.compact_hour_height >= self.hour_height
        {
            return Err(ValidationError::InvalidValue {
                field: "compact_hour_height".into(),
                message: format!(
                    "must be positive and below hour_height ({}), got {}",
                    self.hour_height, self.compact_hour_height
                ),
            });
        }
        Ok(())
    }
}

/// One hour row as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourRow {
    pub hour: u32,
    pub top: f64,
    pub height: f64,
    /// At least one task interval overlaps this hour.
    pub active: bool,
}

/// Row heights plus their prefix sums for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourGrid {
    heights: [f64; HOURS_PER_DAY],
    tops: [f64; HOURS_PER_DAY + 1],
    active: [bool; HOURS_PER_DAY],
}

impl HourGrid {
    /// `spans` are `[start, end)` in minutes from the start of the day; ends
    /// past midnight are fine and simply mark every hour up to 24:00.
    pub fn build(spans: &[(f64, f64)], compact: bool, metrics: &TimelineMetrics) -> Self {
        let mut active = [false; HOURS_PER_DAY];
        for &(start, end) in spans {
            for (hour, slot) in active.iter_mut().enumerate() {
                let lo = hour as f64 * MINUTES_PER_HOUR;
                let hi = lo + MINUTES_PER_HOUR;
                if start < hi && lo < end {
                    *slot = true;
                }
            }
        }

        let mut heights = [metrics.hour_height; HOURS_PER_DAY];
        if compact {
            for (height, is_active) in heights.iter_mut().zip(active) {
                if !is_active {
                    *height = metrics.compact_hour_height;
                }
            }
        }

        let mut tops = [0.0; HOURS_PER_DAY + 1];
        for hour in 0..HOURS_PER_DAY {
            tops[hour + 1] = tops[hour] + heights[hour];
        }

        Self {
            heights,
            tops,
            active,
        }
    }

    /// Vertical offset of a minute-of-day, clamped to the day.
    pub fn offset_at(&self, minute: f64) -> f64 {
        let minute = minute.clamp(0.0, MINUTES_PER_DAY);
        let hour = ((minute / MINUTES_PER_HOUR).floor() as usize).min(HOURS_PER_DAY - 1);
        let into_hour = minute - hour as f64 * MINUTES_PER_HOUR;
        self.tops[hour] + self.heights[hour] * into_hour / MINUTES_PER_HOUR
    }

    pub fn total_height(&self) -> f64 {
        self.tops[HOURS_PER_DAY]
    }

    pub fn is_active(&self, hour: usize) -> bool {
        self.active.get(hour).copied().unwrap_or(false)
    }

    pub fn rows(&self) -> Vec<HourRow> {
        (0..HOURS_PER_DAY)
            .map(|hour| HourRow {
                hour: hour as u32,
                top: self.tops[hour],
                height: self.heights[hour],
                active: self.active[hour],
            })
            .collect()
    }
}

/// Minutes from `day_start` to `at`, with seconds as a fraction.
pub fn minute_of_day(day_start: NaiveDateTime, at: NaiveDateTime) -> f64 {
    (at - day_start).num_seconds() as f64 / MINUTES_PER_HOUR
}
