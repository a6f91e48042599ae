//! Task model.
//!
//! Enum-like fields are closed sets with exhaustive matching. The
//! fixed-time/flexible-window duality is a single [`TimeConstraint`], so a
//! task can never carry both (or neither).

mod record;

pub use record::{decode_records_lenient, TaskRecord};
pub(crate) use record::parse_clock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minimum estimated duration accepted for a task, in minutes.
pub const MIN_ESTIMATED_DURATION: u32 = 5;

/// Collapse a label to lowercase alphanumerics so `"Not Started"`,
/// `"NOT_STARTED"` and `"NotStarted"` compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// User-assigned task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownVariant {
                field: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Progress of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    Partial,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::Partial,
        TaskStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::Partial => "Partial",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "notstarted" => Ok(TaskStatus::NotStarted),
            "partial" => Ok(TaskStatus::Partial),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ValidationError::UnknownVariant {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Regular one-off tasks versus recurring daily activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Regular,
    DailyActivity,
}

impl TaskType {
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Regular => "Regular Task",
            TaskType::DailyActivity => "Daily Activity",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "regular" | "regulartask" => Ok(TaskType::Regular),
            "daily" | "dailyactivity" => Ok(TaskType::DailyActivity),
            _ => Err(ValidationError::UnknownVariant {
                field: "task_type",
                value: s.to_string(),
            }),
        }
    }
}

/// How a task repeats after its anchor (due) date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    #[default]
    None,
    Daily,
    Weekdays,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    pub fn label(&self) -> &'static str {
        match self {
            RecurrencePattern::None => "None",
            RecurrencePattern::Daily => "Daily",
            RecurrencePattern::Weekdays => "Weekdays",
            RecurrencePattern::Weekly => "Weekly",
            RecurrencePattern::Monthly => "Monthly",
        }
    }

    /// Whether a task anchored on `anchor` occurs on `date`.
    ///
    /// Nothing occurs before the anchor. Monthly recurrences skip months that
    /// lack the anchor's day-of-month.
    pub fn occurs_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if date < anchor {
            return false;
        }
        match self {
            RecurrencePattern::None => date == anchor,
            RecurrencePattern::Daily => true,
            RecurrencePattern::Weekdays => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            RecurrencePattern::Weekly => date.weekday() == anchor.weekday(),
            RecurrencePattern::Monthly => date.day() == anchor.day(),
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecurrencePattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "" | "none" => Ok(RecurrencePattern::None),
            "daily" => Ok(RecurrencePattern::Daily),
            "weekdays" => Ok(RecurrencePattern::Weekdays),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            _ => Err(ValidationError::UnknownVariant {
                field: "recurrence_pattern",
                value: s.to_string(),
            }),
        }
    }
}

/// When a task may happen during its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeConstraint {
    /// Pinned to a wall-clock time.
    Fixed { at: NaiveTime },
    /// Anywhere inside `[start, end)`; needs slot finding.
    Flexible { start: NaiveTime, end: NaiveTime },
}

impl TimeConstraint {
    /// Build a flexible window, rejecting empty or inverted ranges.
    pub fn flexible(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidWindow { start, end });
        }
        Ok(TimeConstraint::Flexible { start, end })
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, TimeConstraint::Fixed { .. })
    }

    pub fn fixed_time(&self) -> Option<NaiveTime> {
        match self {
            TimeConstraint::Fixed { at } => Some(*at),
            TimeConstraint::Flexible { .. } => None,
        }
    }
}

/// A task as seen by the scoring, slot-finding and analytics code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Due date; only fixed tasks carry a time of day.
    pub due: NaiveDate,
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub task_type: TaskType,
    pub time: TimeConstraint,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
    /// Minutes.
    pub estimated_duration: u32,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// A regular, not-started, non-recurring task with a 30 minute estimate
    /// and a 09:00-17:00 flexible window.
    pub fn new(id: impl Into<String>, title: impl Into<String>, due: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due,
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
            task_type: TaskType::Regular,
            time: TimeConstraint::Flexible {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            },
            recurrence: RecurrencePattern::None,
            estimated_duration: 30,
            created_at: Utc::now(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_time(mut self, time: TimeConstraint) -> Self {
        self.time = time;
        self
    }

    pub fn with_recurrence(mut self, recurrence: RecurrencePattern) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration = minutes;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_fixed_time(&self) -> bool {
        self.time.is_fixed()
    }

    /// Whether this task shows up on `date`, honouring its recurrence.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.recurrence.occurs_on(self.due, date)
    }

    /// Check invariants that the type system does not cover.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.estimated_duration < MIN_ESTIMATED_DURATION {
            return Err(ValidationError::InvalidValue {
                field: "estimated_duration".into(),
                message: format!(
                    "must be at least {MIN_ESTIMATED_DURATION} minutes, got {}",
                    self.estimated_duration
                ),
            });
        }
        if let TimeConstraint::Flexible { start, end } = self.time {
            if end <= start {
                return Err(ValidationError::InvalidWindow { start, end });
            }
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
