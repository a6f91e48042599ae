//! One-time achievements.

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::user_stats::UserStats;
use crate::task::{Priority, Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    TaskMaster,
    EarlyBird,
    PriorityHandler,
}

impl AchievementId {
    pub const ALL: [AchievementId; 3] = [
        AchievementId::TaskMaster,
        AchievementId::EarlyBird,
        AchievementId::PriorityHandler,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::TaskMaster => "task_master",
            AchievementId::EarlyBird => "early_bird",
            AchievementId::PriorityHandler => "priority_handler",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AchievementId::TaskMaster => "Task Master",
            AchievementId::EarlyBird => "Early Bird",
            AchievementId::PriorityHandler => "Priority Handler",
        }
    }

    pub(crate) fn describe(self, requirement: u32, points: u32) -> Achievement {
        let description = match self {
            AchievementId::TaskMaster => format!("Complete {requirement} tasks in a day"),
            AchievementId::EarlyBird => format!("Complete {requirement} tasks before 10 AM"),
            AchievementId::PriorityHandler => {
                format!("Complete {requirement} high-priority tasks in a row")
            }
        };
        Achievement {
            id: self,
            name: self.name().to_string(),
            description,
            requirement,
            points,
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unlocked (or unlockable) achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub requirement: u32,
    pub points: u32,
}

/// Requirements and rewards for each achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementThresholds {
    /// Tasks due today needed for Task Master
    #[serde(default = "default_task_master_tasks")]
    pub task_master_tasks: u32,
    #[serde(default = "default_task_master_points")]
    pub task_master_points: u32,
    /// Fixed-time tasks before `early_bird_hour` needed for Early Bird
    #[serde(default = "default_early_bird_tasks")]
    pub early_bird_tasks: u32,
    #[serde(default = "default_early_bird_hour")]
    pub early_bird_hour: u32,
    #[serde(default = "default_early_bird_points")]
    pub early_bird_points: u32,
    /// Trailing run of completed high-priority tasks for Priority Handler
    #[serde(default = "default_priority_handler_run")]
    pub priority_handler_run: u32,
    #[serde(default = "default_priority_handler_points")]
    pub priority_handler_points: u32,
}

fn default_task_master_tasks() -> u32 {
    10
}
fn default_task_master_points() -> u32 {
    500
}
fn default_early_bird_tasks() -> u32 {
    5
}
fn default_early_bird_hour() -> u32 {
    10
}
fn default_early_bird_points() -> u32 {
    300
}
fn default_priority_handler_run() -> u32 {
    5
}
fn default_priority_handler_points() -> u32 {
    400
}

impl Default for AchievementThresholds {
    fn default() -> Self {
        Self {
            task_master_tasks: default_task_master_tasks(),
            task_master_points: default_task_master_points(),
            early_bird_tasks: default_early_bird_tasks(),
            early_bird_hour: default_early_bird_hour(),
            early_bird_points: default_early_bird_points(),
            priority_handler_run: default_priority_handler_run(),
            priority_handler_points: default_priority_handler_points(),
        }
    }
}

impl AchievementThresholds {
    pub fn achievement(&self, id: AchievementId) -> Achievement {
        match id {
            AchievementId::TaskMaster => id.describe(self.task_master_tasks, self.task_master_points),
            AchievementId::EarlyBird => id.describe(self.early_bird_tasks, self.early_bird_points),
            AchievementId::PriorityHandler => {
                id.describe(self.priority_handler_run, self.priority_handler_points)
            }
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Evaluates achievement rules against a task list.
///
/// `tasks` is taken as given: the caller decides whether it holds every task
/// or only completed ones. "Today" rules look at tasks due on `today`; the
/// Priority Handler rule looks at the tail of the list in list order.
#[derive(Debug, Clone, Default)]
pub struct AchievementChecker {
    thresholds: AchievementThresholds,
}

impl AchievementChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AchievementThresholds) -> Self {
        Self { thresholds }
    }

    /// The full catalogue with the configured points and requirements.
    pub fn all(&self) -> Vec<Achievement> {
        AchievementId::ALL
            .into_iter()
            .map(|id| self.thresholds.achievement(id))
            .collect()
    }

    fn earned(&self, id: AchievementId, tasks: &[Task], today: NaiveDate) -> bool {
        let t = &self.thresholds;
        let today_tasks = || tasks.iter().filter(move |task| task.due == today);
        match id {
            AchievementId::TaskMaster => count(today_tasks().count()) >= t.task_master_tasks,
            AchievementId::EarlyBird => {
                let early = today_tasks()
                    .filter_map(|task| task.time.fixed_time())
                    .filter(|at| at.hour() < t.early_bird_hour)
                    .count();
                count(early) >= t.early_bird_tasks
            }
            AchievementId::PriorityHandler => {
                let run = t.priority_handler_run as usize;
                let streak = tasks
                    .iter()
                    .rev()
                    .take(run)
                    .filter(|task| {
                        task.priority == Priority::High && task.status == TaskStatus::Completed
                    })
                    .count();
                count(streak) >= t.priority_handler_run
            }
        }
    }

    /// Achievements earned by `tasks` that `stats` does not hold yet.
    pub fn pending(&self, stats: &UserStats, tasks: &[Task], today: NaiveDate) -> Vec<Achievement> {
        AchievementId::ALL
            .into_iter()
            .filter(|id| !stats.has_achievement(*id))
            .filter(|id| self.earned(*id, tasks, today))
            .map(|id| self.thresholds.achievement(id))
            .collect()
    }

    /// Unlock newly earned achievements into `stats`, adding their points.
    pub fn check(&self, stats: &mut UserStats, tasks: &[Task], today: NaiveDate) -> Vec<Achievement> {
        let unlocked: Vec<Achievement> = self
            .pending(stats, tasks, today)
            .into_iter()
            .filter(|achievement| stats.unlock(achievement))
            .collect();
        for achievement in &unlocked {
            tracing::info!(
                achievement = achievement.id.key(),
                points = achievement.points,
                "achievement unlocked"
            );
        }
        unlocked
    }
}

/// Unlock achievements using the default thresholds.
pub fn check_achievements(stats: &mut UserStats, tasks: &[Task], today: NaiveDate) -> Vec<Achievement> {
    AchievementChecker::new().check(stats, tasks, today)
}

/// Report achievements that would unlock, without touching `stats`.
pub fn pending_achievements(stats: &UserStats, tasks: &[Task], today: NaiveDate) -> Vec<Achievement> {
    AchievementChecker::new().pending(stats, tasks, today)
}
