pub mod calendar;
pub mod config;
pub mod progress;
pub mod stats;
pub mod task;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::CommandFactory;
use dayboard_core::calendar::{busy_intervals, collect_events, CalendarSource, JsonFileCalendar};
use dayboard_core::timeline::BusyInterval;
use dayboard_core::{Config, Dashboard, Task, TaskDb};
use std::path::PathBuf;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the task database with the user's config.
pub fn open_dashboard() -> Result<Dashboard<TaskDb>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = TaskDb::open()?;
    Ok(Dashboard::new(db, config))
}

/// `--date` if given, otherwise the local calendar date.
pub fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// clap value parser for `HH:MM`.
pub fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    dayboard_core::calendar::parse_start_time(s).map_err(|e| e.to_string())
}

/// Busy intervals for `date` from calendar files plus fixed tasks.
pub fn busy_for(files: &[PathBuf], tasks: &[Task], date: NaiveDate) -> Vec<BusyInterval> {
    let calendars: Vec<JsonFileCalendar> = files.iter().map(JsonFileCalendar::new).collect();
    let sources: Vec<&dyn CalendarSource> =
        calendars.iter().map(|c| c as &dyn CalendarSource).collect();
    let events = collect_events(&sources, date);
    let busy = busy_intervals(&events, tasks, date);
    tracing::debug!(events = events.len(), busy = busy.len(), %date, "collected busy intervals");
    busy
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn completions(shell: clap_complete::Shell) {
    let mut app = crate::Cli::command();
    let app_name = app.get_name().to_string();
    clap_complete::generate(shell, &mut app, app_name, &mut std::io::stdout());
}
