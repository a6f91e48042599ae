//! Points awarded for a task status change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskStatus};

/// Point values for every reward source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTable {
    #[serde(default = "default_completed")]
    pub completed: u32,
    #[serde(default = "default_partial")]
    pub partial: u32,
    #[serde(default)]
    pub not_started: u32,
    #[serde(default = "default_high_bonus")]
    pub high_bonus: u32,
    #[serde(default = "default_medium_bonus")]
    pub medium_bonus: u32,
    #[serde(default = "default_low_bonus")]
    pub low_bonus: u32,
    /// Completing before the due date.
    #[serde(default = "default_early_bonus")]
    pub early_bonus: u32,
    #[serde(default = "default_daily_streak")]
    pub daily_streak: u32,
    #[serde(default = "default_weekly_streak")]
    pub weekly_streak: u32,
}

fn default_completed() -> u32 {
    100
}
fn default_partial() -> u32 {
    50
}
fn default_high_bonus() -> u32 {
    50
}
fn default_medium_bonus() -> u32 {
    30
}
fn default_low_bonus() -> u32 {
    20
}
fn default_early_bonus() -> u32 {
    50
}
fn default_daily_streak() -> u32 {
    50
}
fn default_weekly_streak() -> u32 {
    200
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            completed: default_completed(),
            partial: default_partial(),
            not_started: 0,
            high_bonus: default_high_bonus(),
            medium_bonus: default_medium_bonus(),
            low_bonus: default_low_bonus(),
            early_bonus: default_early_bonus(),
            daily_streak: default_daily_streak(),
            weekly_streak: default_weekly_streak(),
        }
    }
}

impl PointsTable {
    pub fn base(&self, status: TaskStatus) -> u32 {
        match status {
            TaskStatus::Completed => self.completed,
            TaskStatus::Partial => self.partial,
            TaskStatus::NotStarted => self.not_started,
        }
    }

    pub fn priority_bonus(&self, priority: Priority) -> u32 {
        match priority {
            Priority::High => self.high_bonus,
            Priority::Medium => self.medium_bonus,
            Priority::Low => self.low_bonus,
        }
    }

    /// Points for moving `task` to `new_status` on `today`.
    ///
    /// The priority bonus applies to every transition; the early bonus only
    /// to completions strictly before the due date.
    pub fn points_for(&self, task: &Task, new_status: TaskStatus, today: NaiveDate) -> u32 {
        let early = if new_status == TaskStatus::Completed && today < task.due {
            self.early_bonus
        } else {
            0
        };
        self.base(new_status)
            .saturating_add(self.priority_bonus(task.priority))
            .saturating_add(early)
    }
}

/// Points with the default table.
pub fn calculate_points(task: &Task, new_status: TaskStatus, today: NaiveDate) -> u32 {
    PointsTable::default().points_for(task, new_status, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn task(priority: Priority, due_in_days: i64) -> Task {
        Task::new("t", "Task", today() + Duration::days(due_in_days)).with_priority(priority)
    }

    #[test]
    fn early_high_priority_completion() {
        assert_eq!(calculate_points(&task(Priority::High, 2), TaskStatus::Completed, today()), 200);
    }

    #[test]
    fn no_early_bonus_on_due_date() {
        assert_eq!(calculate_points(&task(Priority::High, 0), TaskStatus::Completed, today()), 150);
        assert_eq!(calculate_points(&task(Priority::Low, -3), TaskStatus::Completed, today()), 120);
    }

    #[test]
    fn partial_and_reset_still_earn_priority_bonus() {
        assert_eq!(calculate_points(&task(Priority::Medium, 5), TaskStatus::Partial, today()), 80);
        assert_eq!(calculate_points(&task(Priority::Low, 5), TaskStatus::NotStarted, today()), 20);
    }

    #[test]
    fn custom_table_from_toml() {
        let table: PointsTable = toml::from_str("completed = 10\nearly_bonus = 0").unwrap();
        assert_eq!(table.points_for(&task(Priority::High, 3), TaskStatus::Completed, today()), 60);
        assert_eq!(table.partial, 50);
    }
}
