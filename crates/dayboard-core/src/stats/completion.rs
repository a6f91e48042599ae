//! Completion aggregation over a lookback window.
//!
//! Buckets the tasks due inside the window by status, by priority and by
//! due-date weekday. Results are request-scoped and never persisted.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::task::{Priority, Task, TaskStatus};

/// Lookback window for analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    #[default]
    LastWeek,
    LastMonth,
    Last3Months,
}

impl TimeRange {
    pub fn lookback_days(&self) -> i64 {
        match self {
            TimeRange::LastWeek => 7,
            TimeRange::LastMonth => 30,
            TimeRange::Last3Months => 90,
        }
    }

    /// Earliest due date included when looking back from `today`.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.lookback_days())
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::LastWeek => "Last Week",
            TimeRange::LastMonth => "Last Month",
            TimeRange::Last3Months => "Last 3 Months",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "week" | "lastweek" => Ok(TimeRange::LastWeek),
            "month" | "lastmonth" => Ok(TimeRange::LastMonth),
            "3months" | "last3months" | "quarter" => Ok(TimeRange::Last3Months),
            _ => Err(ValidationError::UnknownVariant {
                field: "time_range",
                value: s.to_string(),
            }),
        }
    }
}

/// Status counts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u32,
    pub completed: u32,
    pub partial: u32,
    pub not_started: u32,
}

impl StatusCounts {
    fn record(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Partial => self.partial += 1,
            TaskStatus::NotStarted => self.not_started += 1,
        }
    }

    /// Completed share in percent; `None` for an empty bucket.
    pub fn completion_rate(&self) -> Option<f64> {
        percentage(self.completed, self.total)
    }
}

pub(crate) fn percentage(part: u32, total: u32) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(f64::from(part) / f64::from(total) * 100.0)
    }
}

/// Counts for a single priority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStats {
    pub priority: Priority,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Counts for one weekday, keyed by its English name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub day: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Weekdays in report order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Aggregate completion data for one time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub range: TimeRange,
    /// Earliest due date included.
    pub since: NaiveDate,
    pub completed: u32,
    pub partial: u32,
    pub not_started: u32,
    /// Always High, Medium, Low.
    pub priority_stats: Vec<PriorityStats>,
    /// Always Monday through Sunday.
    pub day_stats: Vec<DayStats>,
    /// The tasks that fell inside the range.
    pub tasks: Vec<Task>,
}

impl CompletionStats {
    pub fn total(&self) -> u32 {
        self.completed + self.partial + self.not_started
    }

    /// Overall completion rate in percent; `None` when no tasks matched.
    pub fn completion_rate(&self) -> Option<f64> {
        percentage(self.completed, self.total())
    }

    pub fn priority(&self, priority: Priority) -> Option<&PriorityStats> {
        self.priority_stats.iter().find(|s| s.priority == priority)
    }

    pub fn day(&self, day: Weekday) -> Option<&DayStats> {
        let name = weekday_name(day);
        self.day_stats.iter().find(|s| s.day == name)
    }
}

/// Bucket every task due on or after `range.cutoff(today)`.
pub fn aggregate_completion(tasks: &[Task], range: TimeRange, today: NaiveDate) -> CompletionStats {
    let since = range.cutoff(today);

    let mut overall = StatusCounts::default();
    let mut by_priority: Vec<PriorityStats> = Priority::ALL
        .iter()
        .map(|&priority| PriorityStats {
            priority,
            counts: StatusCounts::default(),
        })
        .collect();
    let mut by_day: Vec<DayStats> = WEEK
        .iter()
        .map(|&day| DayStats {
            day: weekday_name(day).to_string(),
            counts: StatusCounts::default(),
        })
        .collect();

    let in_range: Vec<Task> = tasks.iter().filter(|t| t.due >= since).cloned().collect();

    for task in &in_range {
        overall.record(task.status);
        if let Some(bucket) = by_priority.iter_mut().find(|b| b.priority == task.priority) {
            bucket.counts.record(task.status);
        }
        let day_index = task.due.weekday().num_days_from_monday() as usize;
        by_day[day_index].counts.record(task.status);
    }

    tracing::debug!(
        range = %range,
        since = %since,
        total = overall.total,
        completed = overall.completed,
        "aggregated completion stats"
    );

    CompletionStats {
        range,
        since,
        completed: overall.completed,
        partial: overall.partial,
        not_started: overall.not_started,
        priority_stats: by_priority,
        day_stats: by_day,
        tasks: in_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        // Wednesday
        NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
    }

    fn task(id: &str, days_ago: i64, priority: Priority, status: TaskStatus) -> Task {
        Task::new(id, "Task", today() - Duration::days(days_ago))
            .with_priority(priority)
            .with_status(status)
    }

    #[test]
    fn default_range_is_last_week() {
        assert_eq!(TimeRange::default(), TimeRange::LastWeek);
        assert_eq!(TimeRange::default().lookback_days(), 7);
    }

    #[test]
    fn week_boundary_is_inclusive_at_seven_days() {
        let tasks = vec![
            task("in", 7, Priority::Low, TaskStatus::Completed),
            task("out", 8, Priority::Low, TaskStatus::Completed),
        ];
        let stats = aggregate_completion(&tasks, TimeRange::LastWeek, today());
        assert_eq!(stats.total(), 1);
        assert_eq!(stats.tasks[0].id, "in");
    }

    #[test]
    fn future_tasks_are_included() {
        let tasks = vec![task("soon", -3, Priority::High, TaskStatus::NotStarted)];
        let stats = aggregate_completion(&tasks, TimeRange::LastWeek, today());
        assert_eq!(stats.not_started, 1);
    }

    #[test]
    fn buckets_by_status_priority_and_weekday() {
        let tasks = vec![
            task("a", 0, Priority::High, TaskStatus::Completed),
            task("b", 0, Priority::High, TaskStatus::Partial),
            task("c", 1, Priority::Medium, TaskStatus::NotStarted),
            task("d", 2, Priority::Low, TaskStatus::Completed),
        ];
        let stats = aggregate_completion(&tasks, TimeRange::LastMonth, today());

        assert_eq!((stats.completed, stats.partial, stats.not_started), (2, 1, 1));
        assert_eq!(stats.completion_rate(), Some(50.0));

        let high = stats.priority(Priority::High).unwrap();
        assert_eq!((high.counts.total, high.counts.completed), (2, 1));
        assert_eq!(high.counts.completion_rate(), Some(50.0));

        let wednesday = stats.day(Weekday::Wed).unwrap();
        assert_eq!(wednesday.counts.total, 2);
        assert_eq!(stats.day(Weekday::Tue).unwrap().counts.total, 1);
        assert_eq!(stats.day(Weekday::Mon).unwrap().counts.completed, 1);
        assert_eq!(stats.day_stats[0].day, "Monday");
        assert_eq!(stats.day_stats.len(), 7);
    }

    #[test]
    fn empty_buckets_have_no_rate() {
        let stats = aggregate_completion(&[], TimeRange::Last3Months, today());
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.completion_rate(), None);
        assert!(stats.priority_stats.iter().all(|p| p.counts.completion_rate().is_none()));
    }

    #[test]
    fn time_range_parses_labels() {
        assert_eq!("Last Week".parse::<TimeRange>().unwrap(), TimeRange::LastWeek);
        assert_eq!("last-month".parse::<TimeRange>().unwrap(), TimeRange::LastMonth);
        assert_eq!("Last 3 Months".parse::<TimeRange>().unwrap(), TimeRange::Last3Months);
        assert!("year".parse::<TimeRange>().is_err());
    }

    fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop::sample::select(TaskStatus::ALL.to_vec())
    }

    fn arb_range() -> impl Strategy<Value = TimeRange> {
        prop::sample::select(vec![TimeRange::LastWeek, TimeRange::LastMonth, TimeRange::Last3Months])
    }

    proptest! {
        #[test]
        fn status_counts_sum_to_filtered_total(
            entries in prop::collection::vec((0i64..120, arb_status()), 0..60),
            range in arb_range(),
        ) {
            let tasks: Vec<Task> = entries
                .iter()
                .enumerate()
                .map(|(i, (days, status))| task(&i.to_string(), *days, Priority::Medium, *status))
                .collect();
            let stats = aggregate_completion(&tasks, range, today());

            prop_assert_eq!(stats.completed + stats.partial + stats.not_started, stats.tasks.len() as u32);
            let by_day: u32 = stats.day_stats.iter().map(|d| d.counts.total).sum();
            let by_priority: u32 = stats.priority_stats.iter().map(|p| p.counts.total).sum();
            prop_assert_eq!(by_day, stats.total());
            prop_assert_eq!(by_priority, stats.total());
        }
    }
}
