//! Calendar aggregation.
//!
//! Calendar providers are modeled as [`CalendarSource`]s that hand back plain
//! `{title, start_time, duration, source}` records for a day. Events from
//! all sources are merged and deduplicated, then turned into busy intervals
//! for the slot finder.

mod dedup;

pub use dedup::deduplicate;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CalendarError;
use crate::task::{Task, TimeConstraint};
use crate::timeline::BusyInterval;

/// A calendar entry as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// `HH:MM`, 24h clock.
    pub start_time: String,
    /// `"<n> hours"` or `"<n> minutes"`.
    pub duration: String,
    pub source: String,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        duration: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            duration: duration.into(),
            source: source.into(),
        }
    }

    /// Parsed start time.
    pub fn start(&self) -> Result<NaiveTime, CalendarError> {
        parse_start_time(&self.start_time)
    }

    /// Parsed duration in minutes.
    pub fn duration_minutes(&self) -> Result<u32, CalendarError> {
        parse_duration_minutes(&self.duration)
    }

    /// The time this event blocks.
    pub fn busy_interval(&self) -> Result<BusyInterval, CalendarError> {
        Ok(BusyInterval::new(self.start()?, self.duration_minutes()?))
    }
}

/// Parse an `HH:MM` start time.
pub fn parse_start_time(raw: &str) -> Result<NaiveTime, CalendarError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CalendarError::InvalidTime(raw.to_string()))
}

/// Parse `"<n> <unit>"` into minutes.
///
/// Units: minute(s)/min(s) and hour(s)/hr(s), case-insensitive.
pub fn parse_duration_minutes(raw: &str) -> Result<u32, CalendarError> {
    let invalid = || CalendarError::InvalidDuration(raw.to_string());

    let mut parts = raw.split_whitespace();
    let amount: u32 = parts
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(invalid)?;
    let unit = parts.next().ok_or_else(invalid)?.to_ascii_lowercase();
    if parts.next().is_some() {
        return Err(invalid());
    }

    match unit.as_str() {
        "minute" | "minutes" | "min" | "mins" => Ok(amount),
        "hour" | "hours" | "hr" | "hrs" => amount.checked_mul(60).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// A provider of calendar events.
pub trait CalendarSource {
    /// Display name, used in logs.
    fn name(&self) -> &str;

    /// Events scheduled on `date`.
    fn events_for(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, CalendarError>;
}

/// A source that returns the same events for every day.
#[derive(Debug, Clone)]
pub struct StaticCalendar {
    name: String,
    events: Vec<CalendarEvent>,
}

impl StaticCalendar {
    pub fn new(name: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

impl CalendarSource for StaticCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn events_for(&self, _date: NaiveDate) -> Result<Vec<CalendarEvent>, CalendarError> {
        Ok(self.events.clone())
    }
}

/// Events exported to a JSON file (an array of [`CalendarEvent`]).
#[derive(Debug, Clone)]
pub struct JsonFileCalendar {
    path: PathBuf,
    name: String,
}

impl JsonFileCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl CalendarSource for JsonFileCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn events_for(&self, _date: NaiveDate) -> Result<Vec<CalendarEvent>, CalendarError> {
        let failed = |message: String| CalendarError::SourceFailed {
            source_name: self.name.clone(),
            message,
        };
        let content = std::fs::read_to_string(&self.path).map_err(|e| failed(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| failed(e.to_string()))
    }
}

/// Merge the events of every source for `date` and deduplicate them.
///
/// A failing source is logged and skipped so one broken provider does not
/// blank the whole day.
pub fn collect_events(sources: &[&dyn CalendarSource], date: NaiveDate) -> Vec<CalendarEvent> {
    let mut all = Vec::new();
    for source in sources {
        match source.events_for(date) {
            Ok(events) => {
                tracing::debug!(source = source.name(), count = events.len(), "fetched calendar events");
                all.extend(events);
            }
            Err(err) => {
                tracing::warn!(source = source.name(), error = %err, "calendar source failed");
            }
        }
    }
    deduplicate(all)
}

/// Busy intervals for `date`: every parseable event plus every fixed-time
/// task occurring that day.
pub fn busy_intervals(events: &[CalendarEvent], tasks: &[Task], date: NaiveDate) -> Vec<BusyInterval> {
    let mut busy: Vec<BusyInterval> = events
        .iter()
        .filter_map(|event| match event.busy_interval() {
            Ok(interval) => Some(interval),
            Err(err) => {
                tracing::warn!(title = %event.title, error = %err, "ignoring unparseable calendar event");
                None
            }
        })
        .collect();

    busy.extend(tasks.iter().filter(|task| task.occurs_on(date)).filter_map(|task| {
        match task.time {
            TimeConstraint::Fixed { at } => Some(BusyInterval::new(at, task.estimated_duration)),
            TimeConstraint::Flexible { .. } => None,
        }
    }));

    busy.sort_by_key(|interval| interval.start);
    busy
}
