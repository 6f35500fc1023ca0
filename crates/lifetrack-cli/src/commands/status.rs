use lifetrack_core::StatusReport;

use super::{print_json, Context};

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let engine = config.engine()?;
    let tasks = ctx.tasks()?;

    let pass = engine.pass(&ctx.clock());
    let report = pass.report(&tasks);

    if ctx.json() {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn print_report(report: &[StatusReport]) {
    if report.is_empty() {
        println!("no tasks");
        return;
    }
    for line in report {
        let remaining = line
            .remaining_minutes
            .map(|m| format!("{m}m left"))
            .unwrap_or_default();
        println!(
            "{:<10} {:<9} {:<10} {}",
            line.task_id, line.status, remaining, line.title
        );
    }
}
