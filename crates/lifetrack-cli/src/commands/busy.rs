use chrono::NaiveDate;
use clap::Args;
use lifetrack_core::BusySlot;

use super::{clock_label, print_json, Context};

#[derive(Args)]
pub struct BusyArgs {
    /// Day to check, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,

    /// Candidate start, HH:MM; lists conflicts instead of all busy slots
    #[arg(long)]
    start: Option<String>,

    /// Candidate end, HH:MM (default: start plus the default duration)
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Task being edited; never conflicts with itself
    #[arg(long)]
    exclude: Option<String>,
}

pub fn run(args: BusyArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let engine = config.engine()?;
    let tasks = ctx.tasks()?;
    let pass = engine.pass(&ctx.clock());
    let exclude = args.exclude.as_deref();

    let slots = match &args.start {
        Some(start) => {
            let candidate =
                engine
                    .resolver()
                    .candidate_range(args.date, start, args.end.as_deref())?;
            pass.conflicts(&tasks, args.date, &candidate, exclude)
        }
        None => pass.busy_slots(&tasks, args.date, exclude),
    };

    if ctx.json() {
        return print_json(&slots);
    }

    if slots.is_empty() {
        if args.start.is_some() {
            println!("no conflicts");
        } else {
            println!("no busy slots");
        }
        return Ok(());
    }
    for slot in &slots {
        print_slot(slot, args.date);
    }
    Ok(())
}

fn print_slot(slot: &BusySlot, day: NaiveDate) {
    println!(
        "{}-{:<8} {:<10} {}",
        clock_label(slot.start(), day),
        clock_label(slot.end(), day),
        slot.task_id,
        slot.title
    );
}
