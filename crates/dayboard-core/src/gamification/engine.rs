//! Status-change orchestration.
//!
//! A status change moves [`UserStats`] through three steps in order: award
//! points for the transition, advance streaks, then unlock achievements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::achievements::{Achievement, AchievementChecker, AchievementThresholds};
use super::points::PointsTable;
use super::streak::{StreakConfig, StreakTracker};
use super::user_stats::UserStats;
use crate::task::{Task, TaskStatus};

/// Outcome of one accepted status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Stats after the change; persist these.
    pub stats: UserStats,
    /// Points for the transition itself.
    pub points_awarded: u32,
    /// Points from continuing streaks.
    pub streak_bonus: u32,
    pub unlocked: Vec<Achievement>,
}

impl StatusChange {
    pub fn total_awarded(&self) -> u64 {
        let achievements: u64 = self.unlocked.iter().map(|a| u64::from(a.points)).sum();
        u64::from(self.points_awarded) + u64::from(self.streak_bonus) + achievements
    }
}

#[derive(Debug, Clone, Default)]
pub struct GamificationEngine {
    points: PointsTable,
    streak: StreakTracker,
    achievements: AchievementChecker,
}

impl GamificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(
        points: PointsTable,
        streak: &StreakConfig,
        thresholds: AchievementThresholds,
    ) -> Self {
        Self {
            streak: StreakTracker::with_config(streak, &points),
            achievements: AchievementChecker::with_thresholds(thresholds),
            points,
        }
    }

    pub fn points_table(&self) -> &PointsTable {
        &self.points
    }

    /// Apply `task` moving to `new_status`.
    ///
    /// `task` carries the status before the change. `tasks` is the list the
    /// achievement rules look at and should already reflect the new status.
    /// Returns `None` when the status does not actually change.
    pub fn apply_status_change(
        &self,
        stats: &UserStats,
        task: &Task,
        new_status: TaskStatus,
        tasks: &[Task],
        today: NaiveDate,
    ) -> Option<StatusChange> {
        if task.status == new_status {
            tracing::debug!(task_id = %task.id, status = %new_status, "status unchanged");
            return None;
        }

        let mut next = stats.clone();
        let points_awarded = self.points.points_for(task, new_status, today);
        next.add_points(points_awarded);

        let streak_bonus = self.streak.advance(&mut next, today);
        let unlocked = self.achievements.check(&mut next, tasks, today);

        tracing::info!(
            task_id = %task.id,
            from = %task.status,
            to = %new_status,
            points_awarded,
            streak_bonus,
            unlocked = unlocked.len(),
            total = next.points,
            "status change applied"
        );

        Some(StatusChange {
            stats: next,
            points_awarded,
            streak_bonus,
            unlocked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::{AchievementId, WeekStreakRule};
    use crate::task::Priority;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn same_status_is_rejected() {
        let engine = GamificationEngine::new();
        let task = Task::new("1", "Task", today()).with_status(TaskStatus::Partial);
        assert!(engine
            .apply_status_change(&UserStats::new(), &task, TaskStatus::Partial, &[], today())
            .is_none());
    }

    #[test]
    fn completion_awards_points_then_streaks() {
        let engine = GamificationEngine::new();
        let task = Task::new("1", "Task", today() + Duration::days(1)).with_priority(Priority::High);
        let stats = UserStats {
            last_active: Some(today() - Duration::days(1)),
            daily_streak: 2,
            weekly_streak: 1,
            ..UserStats::default()
        };
        let done = task.clone().with_status(TaskStatus::Completed);

        let change = engine
            .apply_status_change(&stats, &task, TaskStatus::Completed, &[done], today())
            .unwrap();

        assert_eq!(change.points_awarded, 200);
        // 2024-05-05 is a Sunday (ISO week 18), so both streaks continue.
        assert_eq!(change.streak_bonus, 250);
        assert!(change.unlocked.is_empty());
        assert_eq!(change.stats.points, 450);
        assert_eq!(change.stats.daily_streak, 3);
        assert_eq!(change.stats.weekly_streak, 2);
        assert_eq!(change.stats.last_active, Some(today()));
        assert_eq!(change.total_awarded(), 450);
    }

    #[test]
    fn unlocks_are_included_and_not_repeated() {
        let engine = GamificationEngine::new();
        let tasks: Vec<Task> = (0..10)
            .map(|i| Task::new(i.to_string(), "Task", today()).with_status(TaskStatus::Completed))
            .collect();
        let before = Task::new("0", "Task", today());

        let first = engine
            .apply_status_change(&UserStats::new(), &before, TaskStatus::Completed, &tasks, today())
            .unwrap();
        assert_eq!(first.unlocked.len(), 1);
        assert!(first.stats.has_achievement(AchievementId::TaskMaster));
        assert_eq!(first.stats.points, 130 + 250 + 500);

        let second = engine
            .apply_status_change(&first.stats, &before, TaskStatus::Completed, &tasks, today())
            .unwrap();
        assert!(second.unlocked.is_empty());
    }

    #[test]
    fn configured_engine_uses_its_tables() {
        let engine = GamificationEngine::with_config(
            PointsTable {
                partial: 1,
                low_bonus: 0,
                daily_streak: 0,
                weekly_streak: 0,
                ..PointsTable::default()
            },
            &StreakConfig {
                week_rule: WeekStreakRule::CalendarWeeks,
            },
            AchievementThresholds::default(),
        );
        let task = Task::new("1", "Task", today()).with_priority(Priority::Low);
        let change = engine
            .apply_status_change(&UserStats::new(), &task, TaskStatus::Partial, &[], today())
            .unwrap();
        assert_eq!(change.stats.points, 1);
        assert_eq!(engine.points_table().partial, 1);
    }
}
