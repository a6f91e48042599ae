//! SQLite-based storage for tasks and progress.
//!
//! Provides persistent storage for:
//! - Tasks, one row per task in record form
//! - Key-value store for application state (`UserStats` lives here)

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, TaskStore};
use crate::error::{DatabaseError, Result};
use crate::gamification::UserStats;
use crate::task::{decode_records_lenient, Task, TaskRecord, TaskStatus};

/// kv key holding the serialized [`UserStats`].
pub const USER_STATS_KEY: &str = "user_stats";

const DB_FILE: &str = "dayboard.db";

const TASK_COLUMNS: &str = "id, title, date, priority, status, task_type, is_fixed_time,
    fixed_time, flexible_start_time, flexible_end_time, recurrence_pattern,
    estimated_duration, created_at";

/// Format task status for database storage
fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NotStarted => "NOT_STARTED",
        TaskStatus::Partial => "PARTIAL",
        TaskStatus::Completed => "COMPLETED",
    }
}

fn row_to_record(row: &rusqlite::Row) -> Result<TaskRecord, rusqlite::Error> {
    Ok(TaskRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        priority: row.get(3)?,
        status: row.get(4)?,
        task_type: row.get(5)?,
        is_fixed_time: row.get(6)?,
        fixed_time: row.get(7)?,
        flexible_start_time: row.get(8)?,
        flexible_end_time: row.get(9)?,
        recurrence_pattern: row.get(10)?,
        estimated_duration: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// SQLite database for tasks.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the database at `<data_dir>/dayboard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join(DB_FILE))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened task database");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                seq                 INTEGER PRIMARY KEY AUTOINCREMENT,
                id                  TEXT NOT NULL UNIQUE,
                title               TEXT NOT NULL,
                date                TEXT NOT NULL,
                priority            TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'NOT_STARTED',
                task_type           TEXT NOT NULL DEFAULT 'Regular Task',
                is_fixed_time       INTEGER NOT NULL DEFAULT 0,
                fixed_time          TEXT,
                flexible_start_time TEXT,
                flexible_end_time   TEXT,
                recurrence_pattern  TEXT,
                estimated_duration  INTEGER NOT NULL,
                created_at          TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);",
        )?;
        Ok(())
    }

    pub fn create_task(&self, task: &Task) -> Result<()> {
        let record = TaskRecord::from(task);
        self.conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                record.id,
                record.title,
                record.date,
                record.priority,
                format_status(task.status),
                record.task_type,
                record.is_fixed_time,
                record.fixed_time,
                record.flexible_start_time,
                record.flexible_end_time,
                record.recurrence_pattern,
                record.estimated_duration,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID. A row that no longer validates is an error.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?;

        match record {
            Some(record) => Task::try_from(record).map(Some).map_err(|e| {
                DatabaseError::CorruptRow {
                    id: id.to_string(),
                    message: e.to_string(),
                }
                .into()
            }),
            None => Ok(None),
        }
    }

    /// All tasks in insertion order. Rows that fail validation are skipped.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq"))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decode_records_lenient(records))
    }

    pub fn update_task(&self, task: &Task) -> Result<bool> {
        let record = TaskRecord::from(task);
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, date = ?3, priority = ?4, status = ?5, task_type = ?6,
                is_fixed_time = ?7, fixed_time = ?8, flexible_start_time = ?9,
                flexible_end_time = ?10, recurrence_pattern = ?11, estimated_duration = ?12
             WHERE id = ?1",
            params![
                record.id,
                record.title,
                record.date,
                record.priority,
                format_status(task.status),
                record.task_type,
                record.is_fixed_time,
                record.fixed_time,
                record.flexible_start_time,
                record.flexible_end_time,
                record.recurrence_pattern,
                record.estimated_duration,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_task(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Stored progress, or fresh stats if none were saved yet.
    pub fn load_user_stats(&self) -> Result<UserStats> {
        match self.kv_get(USER_STATS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(UserStats::default()),
        }
    }

    pub fn save_user_stats(&self, stats: &UserStats) -> Result<()> {
        let json = serde_json::to_string(stats)?;
        self.kv_set(USER_STATS_KEY, &json)?;
        Ok(())
    }

    /// Forget stored progress; the next load starts from fresh stats.
    pub fn clear_user_stats(&self) -> Result<()> {
        self.kv_delete(USER_STATS_KEY)?;
        Ok(())
    }
}

impl TaskStore for TaskDb {
    fn create(&mut self, task: &Task) -> Result<()> {
        self.create_task(task)
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        self.get_task(id)
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.list_tasks()
    }

    fn update(&mut self, task: &Task) -> Result<bool> {
        self.update_task(task)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        self.delete_task(id)
    }
}
