//! Loosely-typed task records as handed over by a record store or import,
//! and their validated conversion into [`Task`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, RecurrencePattern, Task, TaskStatus, TaskType, TimeConstraint};
use crate::error::ValidationError;

/// Task record shape with string enums and `HH:MM` times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`, or an ISO datetime whose date part is used.
    pub date: String,
    pub priority: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub is_fixed_time: bool,
    #[serde(default)]
    pub fixed_time: Option<String>,
    #[serde(default)]
    pub flexible_start_time: Option<String>,
    #[serde(default)]
    pub flexible_end_time: Option<String>,
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    pub estimated_duration: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("'{value}' is not a date"),
        })
}

/// Parse `HH:MM` (seconds tolerated).
pub(crate) fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("'{value}' is not a HH:MM time"),
        })
}

impl TaskRecord {
    fn time_constraint(&self) -> Result<TimeConstraint, ValidationError> {
        let fixed = self.fixed_time.as_deref().filter(|s| !s.trim().is_empty());
        let start = self
            .flexible_start_time
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        let end = self
            .flexible_end_time
            .as_deref()
            .filter(|s| !s.trim().is_empty());

        let inconsistent = |message: &str| ValidationError::TimeConstraint {
            id: self.id.clone(),
            message: message.to_string(),
        };

        if self.is_fixed_time {
            if start.is_some() || end.is_some() {
                return Err(inconsistent("fixed-time task also carries a flexible window"));
            }
            let at = fixed.ok_or_else(|| inconsistent("fixed-time task has no fixed_time"))?;
            Ok(TimeConstraint::Fixed {
                at: parse_clock("fixed_time", at)?,
            })
        } else {
            if fixed.is_some() {
                return Err(inconsistent("flexible task also carries a fixed_time"));
            }
            match (start, end) {
                (Some(start), Some(end)) => TimeConstraint::flexible(
                    parse_clock("flexible_start_time", start)?,
                    parse_clock("flexible_end_time", end)?,
                ),
                _ => Err(inconsistent("flexible task needs both window bounds")),
            }
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let time = record.time_constraint()?;
        let created_at = match record.created_at.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
                })
                .map_err(|_| ValidationError::InvalidValue {
                    field: "created_at".into(),
                    message: format!("'{raw}' is not a timestamp"),
                })?,
            None => Utc::now(),
        };

        let task = Task {
            due: parse_date("date", &record.date)?,
            priority: record.priority.parse::<Priority>()?,
            status: match record.status.as_deref() {
                Some(s) => s.parse::<TaskStatus>()?,
                None => TaskStatus::default(),
            },
            task_type: match record.task_type.as_deref() {
                Some(s) => s.parse::<TaskType>()?,
                None => TaskType::default(),
            },
            recurrence: match record.recurrence_pattern.as_deref() {
                Some(s) => s.parse::<RecurrencePattern>()?,
                None => RecurrencePattern::default(),
            },
            estimated_duration: record.estimated_duration,
            time,
            created_at,
            id: record.id,
            title: record.title,
        };
        task.validate()?;
        Ok(task)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let (fixed_time, flexible_start_time, flexible_end_time) = match task.time {
            TimeConstraint::Fixed { at } => (Some(at.format("%H:%M").to_string()), None, None),
            TimeConstraint::Flexible { start, end } => (
                None,
                Some(start.format("%H:%M").to_string()),
                Some(end.format("%H:%M").to_string()),
            ),
        };
        TaskRecord {
            id: task.id.clone(),
            title: task.title.clone(),
            date: task.due.format("%Y-%m-%d").to_string(),
            priority: task.priority.label().to_string(),
            status: Some(task.status.label().to_string()),
            task_type: Some(task.task_type.label().to_string()),
            is_fixed_time: task.is_fixed_time(),
            fixed_time,
            flexible_start_time,
            flexible_end_time,
            recurrence_pattern: Some(task.recurrence.label().to_string()),
            estimated_duration: task.estimated_duration,
            created_at: Some(task.created_at.to_rfc3339()),
        }
    }
}

/// Convert a batch of records, dropping the ones that fail validation.
pub fn decode_records_lenient(records: impl IntoIterator<Item = TaskRecord>) -> Vec<Task> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match Task::try_from(record) {
                Ok(task) => Some(task),
                Err(err) => {
                    tracing::warn!(task_id = %id, error = %err, "skipping malformed task record");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flexible_record() -> TaskRecord {
        TaskRecord {
            id: "t-1".into(),
            title: "Read paper".into(),
            date: "2024-05-01".into(),
            priority: "High".into(),
            status: Some("Not Started".into()),
            task_type: Some("Regular Task".into()),
            is_fixed_time: false,
            fixed_time: None,
            flexible_start_time: Some("09:00".into()),
            flexible_end_time: Some("17:00".into()),
            recurrence_pattern: Some("None".into()),
            estimated_duration: 45,
            created_at: Some("2024-04-30T08:00:00+00:00".into()),
        }
    }

    #[test]
    fn decodes_flexible_record() {
        let task = Task::try_from(flexible_record()).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            task.time,
            TimeConstraint::Flexible {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }
        );
    }

    #[test]
    fn accepts_datetime_date_field() {
        let mut record = flexible_record();
        record.date = "2024-05-01T00:00:00".into();
        let task = Task::try_from(record).unwrap();
        assert_eq!(task.due, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn rejects_both_fixed_and_flexible() {
        let mut record = flexible_record();
        record.fixed_time = Some("08:00".into());
        assert!(matches!(
            Task::try_from(record),
            Err(ValidationError::TimeConstraint { .. })
        ));
    }

    #[test]
    fn rejects_neither_fixed_nor_flexible() {
        let mut record = flexible_record();
        record.flexible_start_time = None;
        record.flexible_end_time = None;
        assert!(matches!(
            Task::try_from(record),
            Err(ValidationError::TimeConstraint { .. })
        ));

        let mut record = flexible_record();
        record.is_fixed_time = true;
        record.flexible_start_time = None;
        record.flexible_end_time = None;
        assert!(matches!(
            Task::try_from(record),
            Err(ValidationError::TimeConstraint { .. })
        ));
    }

    #[test]
    fn rejects_unknown_priority() {
        let mut record = flexible_record();
        record.priority = "Critical".into();
        assert!(matches!(
            Task::try_from(record),
            Err(ValidationError::UnknownVariant { field: "priority", .. })
        ));
    }

    #[test]
    fn record_roundtrip_preserves_fixed_time() {
        let mut record = flexible_record();
        record.is_fixed_time = true;
        record.fixed_time = Some("07:45".into());
        record.flexible_start_time = None;
        record.flexible_end_time = None;
        let task = Task::try_from(record).unwrap();

        let back = TaskRecord::from(&task);
        assert!(back.is_fixed_time);
        assert_eq!(back.fixed_time.as_deref(), Some("07:45"));
        assert_eq!(back.status.as_deref(), Some("Not Started"));
        assert_eq!(Task::try_from(back).unwrap(), task);
    }

    #[test]
    fn lenient_decode_skips_bad_records() {
        let mut bad = flexible_record();
        bad.id = "t-2".into();
        bad.status = Some("Archived".into());
        let tasks = decode_records_lenient(vec![flexible_record(), bad]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t-1");
    }
}
