//! Daily and weekly activity streaks.
//!
//! A streak continues when the previous activity was recent enough and
//! resets to 1 otherwise. Continuing a streak pays a bonus; resetting never
//! costs points.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::points::PointsTable;
use super::user_stats::UserStats;

/// How "consecutive weeks" is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStreakRule {
    /// Subtract ISO week numbers and continue when the result is <= 1.
    ///
    /// Ignores the year, so activity 52 weeks apart can continue a streak
    /// and a December-to-January gap of several weeks always does.
    #[default]
    WeekNumberDelta,
    /// Continue when the two dates fall in the same or adjacent
    /// Monday-based weeks.
    CalendarWeeks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default)]
    pub week_rule: WeekStreakRule,
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

impl WeekStreakRule {
    pub fn continues(&self, last: NaiveDate, today: NaiveDate) -> bool {
        match self {
            WeekStreakRule::WeekNumberDelta => {
                i64::from(today.iso_week().week()) - i64::from(last.iso_week().week()) <= 1
            }
            WeekStreakRule::CalendarWeeks => {
                (week_start(today) - week_start(last)).num_days() <= 7
            }
        }
    }
}

/// Advances streaks once per status-change event.
#[derive(Debug, Clone)]
pub struct StreakTracker {
    rule: WeekStreakRule,
    daily_bonus: u32,
    weekly_bonus: u32,
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self::with_config(&StreakConfig::default(), &PointsTable::default())
    }
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &StreakConfig, points: &PointsTable) -> Self {
        Self {
            rule: config.week_rule,
            daily_bonus: points.daily_streak,
            weekly_bonus: points.weekly_streak,
        }
    }

    /// Update streaks in place and return the bonus points added.
    pub(crate) fn advance(&self, stats: &mut UserStats, today: NaiveDate) -> u32 {
        let last = stats.last_active.unwrap_or(today);
        let mut bonus = 0u32;

        if (today - last).num_days() <= 1 {
            stats.daily_streak = stats.daily_streak.saturating_add(1);
            bonus = bonus.saturating_add(self.daily_bonus);
        } else {
            tracing::info!(
                previous = stats.daily_streak,
                last_active = %last,
                "daily streak reset"
            );
            stats.daily_streak = 1;
        }

        if self.rule.continues(last, today) {
            stats.weekly_streak = stats.weekly_streak.saturating_add(1);
            bonus = bonus.saturating_add(self.weekly_bonus);
        } else {
            tracing::info!(
                previous = stats.weekly_streak,
                last_active = %last,
                "weekly streak reset"
            );
            stats.weekly_streak = 1;
        }

        stats.add_points(bonus);
        stats.last_active = Some(today);

        tracing::debug!(
            daily = stats.daily_streak,
            weekly = stats.weekly_streak,
            bonus,
            "streaks updated"
        );
        bonus
    }

    pub fn update(&self, mut stats: UserStats, today: NaiveDate) -> UserStats {
        self.advance(&mut stats, today);
        stats
    }
}

/// Update streaks with the default rule and bonuses.
pub fn update_streak(stats: UserStats, today: NaiveDate) -> UserStats {
    StreakTracker::new().update(stats, today)
}
