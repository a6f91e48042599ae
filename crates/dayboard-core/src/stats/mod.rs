//! Completion statistics.
//!
//! This module provides:
//! - Status, priority and weekday aggregation over a lookback range
//! - Trend views for charts (daily counts, priority shares, best days)

mod completion;
mod trend;

pub use completion::{
    aggregate_completion, weekday_name, CompletionStats, DayStats, PriorityStats, StatusCounts,
    TimeRange, WEEK,
};
pub use trend::{
    best_days, daily_trend, priority_breakdown, time_distribution, DailyPoint, DayRate, FixedPoint,
    FlexibleSpan, PriorityShare, TimeDistribution,
};
