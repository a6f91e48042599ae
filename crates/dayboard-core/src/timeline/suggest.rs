//! Start-time suggestions for tasks.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::slots::{BusyInterval, SlotFinder};
use crate::task::{Task, TimeConstraint};

/// Where a suggested start time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// The task is pinned; no search was made.
    Fixed { at: NaiveTime },
    /// Earliest free slot inside the task's flexible window.
    Slot { at: NaiveTime },
    /// No gap in the window is long enough.
    NoSlot,
}

impl Suggestion {
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Suggestion::Fixed { at } | Suggestion::Slot { at } => Some(*at),
            Suggestion::NoSlot => None,
        }
    }
}

/// Suggest a start time for `task` given the day's busy intervals.
///
/// Fixed-time tasks bypass the slot finder entirely.
pub fn suggest_task_time(task: &Task, busy: &[BusyInterval]) -> Suggestion {
    match task.time {
        TimeConstraint::Fixed { at } => Suggestion::Fixed { at },
        TimeConstraint::Flexible { start, end } => {
            match SlotFinder::new(busy).earliest_slot(start, end, task.estimated_duration) {
                Some(at) => Suggestion::Slot { at },
                None => {
                    tracing::debug!(task_id = %task.id, "no free slot in flexible window");
                    Suggestion::NoSlot
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn fixed_task_returns_its_time() {
        let task = Task::new("1", "Standup", day()).with_time(TimeConstraint::Fixed { at: time(9, 0) });
        let busy = [BusyInterval::new(time(9, 0), 60)];
        assert_eq!(suggest_task_time(&task, &busy), Suggestion::Fixed { at: time(9, 0) });
    }

    #[test]
    fn flexible_task_gets_earliest_slot() {
        let task = Task::new("1", "Write", day())
            .with_time(TimeConstraint::Flexible { start: time(9, 0), end: time(17, 0) })
            .with_duration(30);
        let busy = [
            BusyInterval::new(time(9, 0), 60),
            BusyInterval::new(time(14, 0), 120),
        ];
        assert_eq!(suggest_task_time(&task, &busy).time(), Some(time(10, 0)));
    }

    #[test]
    fn flexible_task_without_room() {
        let task = Task::new("1", "Deep work", day())
            .with_time(TimeConstraint::Flexible { start: time(9, 0), end: time(10, 0) })
            .with_duration(90);
        assert_eq!(suggest_task_time(&task, &[]), Suggestion::NoSlot);
    }
}
