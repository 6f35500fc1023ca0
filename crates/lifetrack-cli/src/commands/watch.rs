use clap::Args;
use lifetrack_core::{Clock, StatusReport, TickInterval, Ticker};
use serde::Serialize;

use super::{print_json, status::print_report, Context};

#[derive(Args)]
pub struct WatchArgs {
    /// Stop after this many refreshes (default: run until interrupted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds between refreshes, 1-60 (default from config)
    #[arg(long)]
    interval: Option<u64>,
}

#[derive(Serialize)]
struct Frame<'a> {
    seq: u64,
    now: chrono::NaiveDateTime,
    tasks: &'a [StatusReport],
}

pub fn run(args: WatchArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let engine = config.engine()?;
    let interval = args
        .interval
        .map(TickInterval::from_secs)
        .unwrap_or(config.clock.tick_seconds);

    let mut ticker = Ticker::new(ctx.clock(), interval);
    let mut now = ticker.clock().now();

    loop {
        // Reloaded every tick so edits to the task file show up.
        let tasks = ctx.tasks()?;
        let pass = engine.pass_at(now);
        let report = pass.report(&tasks);

        if ctx.json() {
            print_json(&Frame {
                seq: pass.seq(),
                now: pass.now(),
                tasks: &report,
            })?;
        } else {
            println!("-- {} --", pass.now().format("%Y-%m-%d %H:%M:%S"));
            print_report(&report);
        }

        if args.ticks.is_some_and(|limit| ticker.ticks() >= limit) {
            break;
        }
        now = ticker.tick();
    }
    Ok(())
}
