use clap::Args;
use lifetrack_core::QuadrantMode;
use serde::Serialize;

use super::{print_json, title_of, Context};

#[derive(Args)]
pub struct QuadrantArgs {
    /// urgent-important, status, date or time (default from config)
    #[arg(long)]
    mode: Option<QuadrantMode>,

    /// Show one task's quadrant in every mode instead of a board
    #[arg(long)]
    task: Option<String>,
}

#[derive(Serialize)]
struct TaskQuadrants<'a> {
    task_id: &'a str,
    quadrants: Vec<ModeQuadrant>,
}

#[derive(Serialize)]
struct ModeQuadrant {
    mode: QuadrantMode,
    quadrant: Option<lifetrack_core::Quadrant>,
}

pub fn run(args: QuadrantArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let engine = config.engine()?;
    let tasks = ctx.tasks()?;
    let pass = engine.pass(&ctx.clock());

    if let Some(id) = args.task {
        let task = tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("task not found: {id}"))?;
        let quadrants: Vec<ModeQuadrant> = pass
            .assign_all(task)
            .into_iter()
            .map(|(mode, quadrant)| ModeQuadrant { mode, quadrant })
            .collect();

        if ctx.json() {
            print_json(&TaskQuadrants {
                task_id: &task.id,
                quadrants,
            })?;
        } else {
            println!("{} {}", task.id, task.title);
            for q in quadrants {
                let label = q.quadrant.map(|q| q.to_string()).unwrap_or_else(|| "-".into());
                println!("  {:<17} {}", q.mode.to_string(), label);
            }
        }
        return Ok(());
    }

    let mode = args.mode.unwrap_or(config.quadrants.default_mode);
    let board = pass.board(&tasks, mode);

    if ctx.json() {
        print_json(&board)?;
        return Ok(());
    }

    println!("mode: {}", board.mode);
    for column in &board.columns {
        println!("{} ({})", column.quadrant, column.task_ids.len());
        for id in &column.task_ids {
            println!("  - {id} {}", title_of(&tasks, id));
        }
    }
    if !board.unassigned.is_empty() {
        println!("unassigned ({})", board.unassigned.len());
        for id in &board.unassigned {
            println!("  - {id} {}", title_of(&tasks, id));
        }
    }
    Ok(())
}
