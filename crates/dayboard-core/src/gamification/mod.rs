//! Points, streaks and achievements.
//!
//! Everything here is driven by a single event: a task moving to a new
//! status. [`GamificationEngine::apply_status_change`] runs the full
//! sequence; the free functions expose each step with default settings.

mod achievements;
mod engine;
mod points;
mod streak;
mod user_stats;

pub use achievements::{
    check_achievements, pending_achievements, Achievement, AchievementChecker, AchievementId,
    AchievementThresholds,
};
pub use engine::{GamificationEngine, StatusChange};
pub use points::{calculate_points, PointsTable};
pub use streak::{update_streak, StreakConfig, StreakTracker, WeekStreakRule};
pub use user_stats::UserStats;
