pub mod busy;
pub mod completions;
pub mod config;
pub mod quadrant;
pub mod status;
pub mod timeline;
pub mod watch;

use chrono::{NaiveDateTime, Timelike};
use clap::Args;
use lifetrack_core::storage::{default_tasks_path, load_tasks};
use lifetrack_core::{Clock, Config, FixedClock, SystemClock, Task};
use serde::Serialize;
use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// JSON task file (default: <data dir>/tasks.json)
    #[arg(long, global = true)]
    pub tasks: Option<PathBuf>,

    /// Pin the clock, e.g. 2024-03-01T09:45
    #[arg(long, global = true, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Machine-readable output
    #[arg(long, global = true)]
    pub json: bool,
}

/// Lazily loaded inputs for a command.
pub struct Context {
    args: GlobalArgs,
}

impl Context {
    pub fn new(args: GlobalArgs) -> Self {
        Self { args }
    }

    pub fn json(&self) -> bool {
        self.args.json
    }

    pub fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        Ok(Config::load()?)
    }

    pub fn tasks(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let path = match &self.args.tasks {
            Some(path) => path.clone(),
            None => default_tasks_path()?,
        };
        tracing::debug!("reading tasks from {}", path.display());
        Ok(load_tasks(&path)?)
    }

    /// The pinned clock from `--now`, or the system clock.
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.args.now {
            Some(now) => Box::new(FixedClock::new(now)),
            None => Box::new(SystemClock),
        }
    }
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{raw}'"))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `HH:MM`, with a `+1` suffix when `at` falls after `day`.
pub fn clock_label(at: NaiveDateTime, day: chrono::NaiveDate) -> String {
    let label = format!("{:02}:{:02}", at.hour(), at.minute());
    if at.date() > day {
        format!("{label}+1")
    } else {
        label
    }
}

pub fn title_of<'a>(tasks: &'a [Task], id: &str) -> &'a str {
    tasks
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.title.as_str())
        .unwrap_or("")
}
