mod config;
mod memory;
mod task_db;

pub use config::{Config, PlannerConfig};
pub use memory::InMemoryTaskStore;
pub use task_db::{TaskDb, USER_STATS_KEY};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::task::Task;

/// Persistent home for tasks.
///
/// Implementations keep insertion order for `list`.
pub trait TaskStore {
    fn create(&mut self, task: &Task) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<Task>>;
    fn list(&self) -> Result<Vec<Task>>;
    /// Replace a stored task. Returns false if no task has that id.
    fn update(&mut self, task: &Task) -> Result<bool>;
    /// Returns false if no task has that id.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

/// Returns the data directory, creating it if needed.
///
/// `DAYBOARD_HOME` wins when set. Otherwise `~/.config/dayboard[-dev]/`,
/// with the `-dev` suffix selected by `DAYBOARD_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("DAYBOARD_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayboard-dev")
            } else {
                base_dir.join("dayboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
