//! JSON task file.
//!
//! The engine does not own task persistence; this is the plain file the CLI
//! reads so it can be used without the rest of the app.

use std::path::Path;

use crate::error::Result;
use crate::task::Task;

/// Read a JSON array of tasks. A missing file is an empty list.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a task array.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no task file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let tasks: Vec<Task> = serde_json::from_str(&content)?;
    tracing::debug!("loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// # Errors
/// Returns an error if the tasks cannot be serialized or written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let content = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, content)?;
    Ok(())
}
