mod config;
mod tasks;

pub use config::{ClockConfig, Config, QuadrantsConfig, TimelineConfig};
pub use tasks::{load_tasks, save_tasks};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `LIFETRACK_HOME` wins when set. Otherwise `~/.config/lifetrack[-dev]/`
/// based on `LIFETRACK_ENV`; set `LIFETRACK_ENV=dev` to use the development
/// data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("LIFETRACK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LIFETRACK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("lifetrack-dev")
            } else {
                base_dir.join("lifetrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `<data dir>/tasks.json`
///
/// # Errors
/// Returns an error if the data directory cannot be created.
pub fn default_tasks_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("tasks.json"))
}
