use chrono::NaiveDate;
use clap::Args;

use super::{clock_label, print_json, Context};

#[derive(Args)]
pub struct TimelineArgs {
    /// Day to lay out, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Shrink hours with no tasks
    #[arg(long)]
    compact: bool,
}

pub fn run(args: TimelineArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let engine = config.engine()?;
    let tasks = ctx.tasks()?;
    let pass = engine.pass(&ctx.clock());

    let day = args.date.unwrap_or_else(|| pass.today());
    let compact = args.compact || config.timeline.compact;
    let layout = pass.layout(&tasks, day, compact);

    if ctx.json() {
        return print_json(&layout);
    }

    println!(
        "{}{}  height {:.0}",
        layout.day,
        if layout.compact { " (compact)" } else { "" },
        layout.total_height
    );
    if layout.bars.is_empty() {
        println!("no timed tasks");
    }
    for bar in &layout.bars {
        let remaining = bar
            .remaining_minutes
            .map(|m| format!(" {m}m left"))
            .unwrap_or_default();
        let overlaps = if bar.overlaps_with.is_empty() {
            String::new()
        } else {
            format!("  overlaps: {}", bar.overlaps_with.join(", "))
        };
        println!(
            "{}-{:<8} top {:>6.1} h {:>5.1}  {}{}  {}{}",
            clock_label(bar.start, day),
            clock_label(bar.end, day),
            bar.top_offset,
            bar.height,
            bar.status,
            remaining,
            bar.title,
            overlaps
        );
    }
    if !layout.untimed.is_empty() {
        println!("all day: {}", layout.untimed.join(", "));
    }
    if let Some(offset) = layout.now_offset {
        println!("now at {offset:.1}");
    }
    Ok(())
}
