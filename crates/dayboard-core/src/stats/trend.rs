//! Chart-ready views derived from [`CompletionStats`].
//!
//! These only reshape the aggregate; rendering is left to the caller.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::completion::{percentage, CompletionStats};
use crate::task::{Priority, TaskStatus, TimeConstraint};

/// Completed and partial counts for one due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub completed: u32,
    pub partial: u32,
}

/// Per-due-date completion counts, oldest first.
pub fn daily_trend(stats: &CompletionStats) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for task in &stats.tasks {
        let entry = by_date.entry(task.due).or_default();
        match task.status {
            TaskStatus::Completed => entry.0 += 1,
            TaskStatus::Partial => entry.1 += 1,
            TaskStatus::NotStarted => {}
        }
    }
    by_date
        .into_iter()
        .map(|(date, (completed, partial))| DailyPoint {
            date,
            completed,
            partial,
        })
        .collect()
}

/// Status shares for one priority level, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityShare {
    pub priority: Priority,
    pub total: u32,
    pub completed_pct: f64,
    pub partial_pct: f64,
    pub not_started_pct: f64,
}

/// Status distribution per priority. Priorities without tasks are omitted.
pub fn priority_breakdown(stats: &CompletionStats) -> Vec<PriorityShare> {
    stats
        .priority_stats
        .iter()
        .filter_map(|bucket| {
            let counts = bucket.counts;
            Some(PriorityShare {
                priority: bucket.priority,
                total: counts.total,
                completed_pct: percentage(counts.completed, counts.total)?,
                partial_pct: percentage(counts.partial, counts.total)?,
                not_started_pct: percentage(counts.not_started, counts.total)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRate {
    pub day: String,
    pub total: u32,
    pub completion_rate: f64,
}

/// Weekdays that had tasks, best completion rate first.
pub fn best_days(stats: &CompletionStats) -> Vec<DayRate> {
    let mut days: Vec<DayRate> = stats
        .day_stats
        .iter()
        .filter_map(|d| {
            d.counts.completion_rate().map(|rate| DayRate {
                day: d.day.clone(),
                total: d.counts.total,
                completion_rate: rate,
            })
        })
        .collect();
    days.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate));
    days
}

/// A fixed-time task placed on the day's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    /// Fractional hour, e.g. 9.5 for 09:30.
    pub hour: f64,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
}

/// A flexible task's permitted window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub fixed: Vec<FixedPoint>,
    pub flexible: Vec<FlexibleSpan>,
}

fn fractional_hour(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

/// When in the day tasks are placed, split by constraint kind.
pub fn time_distribution(stats: &CompletionStats) -> TimeDistribution {
    let mut dist = TimeDistribution::default();
    for task in &stats.tasks {
        match task.time {
            TimeConstraint::Fixed { at } => dist.fixed.push(FixedPoint {
                hour: fractional_hour(at),
                title: task.title.clone(),
                status: task.status,
                priority: task.priority,
            }),
            TimeConstraint::Flexible { start, end } => dist.flexible.push(FlexibleSpan {
                start,
                end,
                title: task.title.clone(),
                status: task.status,
                priority: task.priority,
            }),
        }
    }
    dist.fixed.sort_by(|a, b| a.hour.total_cmp(&b.hour));
    dist.flexible.sort_by_key(|span| span.start);
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{aggregate_completion, TimeRange};
    use crate::task::Task;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample() -> CompletionStats {
        let tasks = vec![
            Task::new("a", "Review", today())
                .with_priority(Priority::High)
                .with_status(TaskStatus::Completed)
                .with_time(TimeConstraint::Fixed { at: time(9, 30) }),
            Task::new("b", "Gym", today())
                .with_priority(Priority::Low)
                .with_status(TaskStatus::Partial)
                .with_time(TimeConstraint::Fixed { at: time(7, 0) }),
            Task::new("c", "Write", today() - Duration::days(1))
                .with_priority(Priority::High)
                .with_status(TaskStatus::NotStarted),
            Task::new("d", "Read", today() - Duration::days(2))
                .with_priority(Priority::High)
                .with_status(TaskStatus::Completed),
        ];
        aggregate_completion(&tasks, TimeRange::LastWeek, today())
    }

    #[test]
    fn daily_trend_is_date_ordered() {
        let trend = daily_trend(&sample());
        let dates: Vec<_> = trend.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![today() - Duration::days(2), today() - Duration::days(1), today()]
        );
        assert_eq!((trend[2].completed, trend[2].partial), (1, 1));
        assert_eq!((trend[1].completed, trend[1].partial), (0, 0));
    }

    #[test]
    fn priority_breakdown_skips_empty_levels() {
        let shares = priority_breakdown(&sample());
        let levels: Vec<_> = shares.iter().map(|s| s.priority).collect();
        assert_eq!(levels, vec![Priority::High, Priority::Low]);

        let high = &shares[0];
        assert_eq!(high.total, 3);
        assert!((high.completed_pct - 200.0 / 3.0).abs() < 1e-9);
        assert!((high.completed_pct + high.partial_pct + high.not_started_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn best_days_sorted_by_rate() {
        let days = best_days(&sample());
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, "Monday");
        assert_eq!(days[0].completion_rate, 100.0);
        assert_eq!(days.last().unwrap().day, "Tuesday");
    }

    #[test]
    fn time_distribution_splits_fixed_and_flexible() {
        let dist = time_distribution(&sample());
        assert_eq!(dist.fixed.len(), 2);
        assert_eq!(dist.fixed[0].title, "Gym");
        assert_eq!(dist.fixed[1].hour, 9.5);
        assert_eq!(dist.flexible.len(), 2);
        assert_eq!(dist.flexible[0].start, time(9, 0));
    }
}
