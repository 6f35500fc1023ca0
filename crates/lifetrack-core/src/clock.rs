//! Wall-clock access.
//!
//! The clock is the only source of temporal non-determinism in the crate.
//! Everything else takes `now` as a parameter; a pass reads the clock once
//! and threads that value through every computation.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Block until `interval` has elapsed on this clock.
    fn sleep(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn sleep(&mut self, interval: Duration) {
        (**self).sleep(interval);
    }
}

/// The system's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to a given instant. Sleeping advances it instead of
/// blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn advance(&mut self, by: chrono::Duration) {
        self.now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn sleep(&mut self, interval: Duration) {
        // Sub-second remainders are irrelevant at tick granularity.
        self.advance(chrono::Duration::seconds(interval.as_secs() as i64));
    }
}

/// Refresh cadence, between 1 and 60 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct TickInterval(u64);

impl TickInterval {
    pub const MIN_SECONDS: u64 = 1;
    pub const MAX_SECONDS: u64 = 60;

    /// Out-of-range values are clamped.
    pub fn from_secs(seconds: u64) -> Self {
        let clamped = seconds.clamp(Self::MIN_SECONDS, Self::MAX_SECONDS);
        if clamped != seconds {
            tracing::warn!("tick interval {}s out of range, using {}s", seconds, clamped);
        }
        Self(clamped)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self(30)
    }
}

impl From<u64> for TickInterval {
    fn from(seconds: u64) -> Self {
        Self::from_secs(seconds)
    }
}

impl From<TickInterval> for u64 {
    fn from(interval: TickInterval) -> Self {
        interval.0
    }
}

/// Drives periodic recomputation: each tick sleeps one interval, then reads
/// the clock exactly once.
#[derive(Debug)]
pub struct Ticker<C: Clock> {
    clock: C,
    interval: TickInterval,
    ticks: u64,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C, interval: TickInterval) -> Self {
        Self {
            clock,
            interval,
            ticks: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn interval(&self) -> TickInterval {
        self.interval
    }

    /// Number of ticks taken so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wait for the next tick and return the time read at it.
    pub fn tick(&mut self) -> NaiveDateTime {
        self.clock.sleep(self.interval.as_duration());
        self.ticks += 1;
        self.clock.now()
    }
}
