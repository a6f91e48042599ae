//! Completion statistics commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::stats::{
    best_days, daily_trend, priority_breakdown, time_distribution, DailyPoint, DayRate,
    PriorityShare, TimeDistribution,
};
use dayboard_core::TimeRange;
use serde::Serialize;

use super::{open_dashboard, print_json, resolve_date, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Status counts per priority and weekday
    Completion {
        /// last-week, last-month or last-3-months
        #[arg(long, default_value = "last-week")]
        range: TimeRange,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Daily trend, priority shares, best days and time distribution
    Trend {
        #[arg(long, default_value = "last-week")]
        range: TimeRange,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct TrendReport {
    range: TimeRange,
    completion_rate: Option<f64>,
    daily: Vec<DailyPoint>,
    priority: Vec<PriorityShare>,
    best_days: Vec<DayRate>,
    time_distribution: TimeDistribution,
}

pub fn run(action: StatsAction) -> CmdResult {
    let dash = open_dashboard()?;

    match action {
        StatsAction::Completion { range, date } => {
            let stats = dash.completion(range, resolve_date(date))?;
            if stats.total() == 0 {
                eprintln!("No tasks due in range: {range}");
            }
            print_json(&stats)?;
        }
        StatsAction::Trend { range, date } => {
            let stats = dash.completion(range, resolve_date(date))?;
            print_json(&TrendReport {
                range,
                completion_rate: stats.completion_rate(),
                daily: daily_trend(&stats),
                priority: priority_breakdown(&stats),
                best_days: best_days(&stats),
                time_distribution: time_distribution(&stats),
            })?;
        }
    }
    Ok(())
}
