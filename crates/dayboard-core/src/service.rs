//! Task-store facade used by front ends.
//!
//! Wires a [`TaskStore`] to the configured scorer and gamification engine so
//! callers deal in ids and statuses rather than individual algorithms.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::gamification::{GamificationEngine, StatusChange, UserStats};
use crate::stats::{aggregate_completion, CompletionStats, TimeRange};
use crate::storage::{Config, TaskStore};
use crate::task::{Priority, RecurrencePattern, Task, TaskStatus, TaskType, TimeConstraint};
use crate::timeline::{suggest_task_time, BusyInterval, PriorityScorer, ScoreBreakdown, Suggestion};

/// Input for [`Dashboard::add_task`]. Unset fields fall back to the planner
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub due: NaiveDate,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub time: Option<TimeConstraint>,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl NewTask {
    pub fn new(title: impl Into<String>, due: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due,
            priority: default_priority(),
            task_type: TaskType::default(),
            time: None,
            recurrence: RecurrencePattern::default(),
            estimated_duration: None,
        }
    }
}

/// A task with its score, as returned by [`Dashboard::ranked`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTask {
    pub task: Task,
    pub score: ScoreBreakdown,
}

pub struct Dashboard<S: TaskStore> {
    store: S,
    config: Config,
    scorer: PriorityScorer,
    engine: GamificationEngine,
}

impl<S: TaskStore> Dashboard<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self {
            scorer: config.scorer(),
            engine: config.engine(),
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a task with a fresh UUID.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        let time = match new.time {
            Some(time) => time,
            None => self.config.planner.window()?,
        };
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            due: new.due,
            priority: new.priority,
            status: TaskStatus::NotStarted,
            task_type: new.task_type,
            time,
            recurrence: new.recurrence,
            estimated_duration: new
                .estimated_duration
                .unwrap_or(self.config.planner.default_duration),
            created_at: Utc::now(),
        };
        task.validate()?;
        self.store.create(&task)?;
        tracing::info!(task_id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store.get(id)?.ok_or_else(|| CoreError::NotFound {
            kind: "task",
            id: id.to_string(),
        })
    }

    /// All tasks, optionally restricted to one type.
    pub fn list_tasks(&self, filter: Option<TaskType>) -> Result<Vec<Task>> {
        let tasks = self.store.list()?;
        Ok(match filter {
            Some(task_type) => tasks.into_iter().filter(|t| t.task_type == task_type).collect(),
            None => tasks,
        })
    }

    /// Tasks that occur on `date`, recurrences included.
    pub fn tasks_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|t| t.occurs_on(date))
            .collect())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let deleted = self.store.delete(id)?;
        if deleted {
            tracing::info!(task_id = %id, "task deleted");
        }
        Ok(deleted)
    }

    /// Move a task to `new_status` and run the gamification sequence.
    ///
    /// The store is updated before achievements are checked, so the rules
    /// see the new status. Returns `Ok(None)` when the status is unchanged.
    pub fn update_status(
        &mut self,
        id: &str,
        new_status: TaskStatus,
        stats: &UserStats,
        today: NaiveDate,
    ) -> Result<Option<StatusChange>> {
        let task = self.get_task(id)?;
        if task.status == new_status {
            return Ok(None);
        }

        self.store.update(&task.clone().with_status(new_status))?;
        let tasks = self.store.list()?;
        Ok(self
            .engine
            .apply_status_change(stats, &task, new_status, &tasks, today))
    }

    pub fn completion(&self, range: TimeRange, today: NaiveDate) -> Result<CompletionStats> {
        Ok(aggregate_completion(&self.store.list()?, range, today))
    }

    /// Open (not completed) tasks, highest score first.
    pub fn ranked(&self, today: NaiveDate) -> Result<Vec<RankedTask>> {
        let mut ranked: Vec<RankedTask> = self
            .store
            .list()?
            .into_iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .map(|task| RankedTask {
                score: self.scorer.breakdown(&task, today),
                task,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
        Ok(ranked)
    }

    pub fn suggest(&self, id: &str, busy: &[BusyInterval]) -> Result<Suggestion> {
        Ok(suggest_task_time(&self.get_task(id)?, busy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTaskStore;
    use chrono::{Duration, NaiveTime};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn dashboard() -> Dashboard<InMemoryTaskStore> {
        Dashboard::new(InMemoryTaskStore::new(), Config::default())
    }

    #[test]
    fn add_task_applies_planner_defaults() {
        let mut dash = dashboard();
        let task = dash.add_task(NewTask::new("Write report", today())).unwrap();
        assert_eq!(task.estimated_duration, 30);
        assert_eq!(
            task.time,
            TimeConstraint::Flexible {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }
        );
        assert_eq!(dash.list_tasks(None).unwrap().len(), 1);
    }

    #[test]
    fn add_task_rejects_invalid_input() {
        let mut dash = dashboard();
        let mut new = NewTask::new("  ", today());
        assert!(dash.add_task(new.clone()).is_err());
        new.title = "Short".into();
        new.estimated_duration = Some(2);
        assert!(dash.add_task(new).is_err());
        assert!(dash.list_tasks(None).unwrap().is_empty());
    }

    #[test]
    fn list_filters_by_type_and_tasks_on_follows_recurrence() {
        let mut dash = dashboard();
        let mut habit = NewTask::new("Stretch", today());
        habit.task_type = TaskType::DailyActivity;
        habit.recurrence = RecurrencePattern::Daily;
        dash.add_task(habit).unwrap();
        dash.add_task(NewTask::new("One-off", today())).unwrap();

        assert_eq!(dash.list_tasks(Some(TaskType::DailyActivity)).unwrap().len(), 1);
        assert_eq!(dash.tasks_on(today()).unwrap().len(), 2);
        let tomorrow = dash.tasks_on(today() + Duration::days(1)).unwrap();
        assert_eq!(tomorrow.len(), 1);
        assert_eq!(tomorrow[0].title, "Stretch");
    }

    #[test]
    fn update_status_persists_and_awards() {
        let mut dash = dashboard();
        let mut new = NewTask::new("Ship", today() + Duration::days(2));
        new.priority = Priority::High;
        let task = dash.add_task(new).unwrap();

        let change = dash
            .update_status(&task.id, TaskStatus::Completed, &UserStats::new(), today())
            .unwrap()
            .unwrap();
        assert_eq!(change.points_awarded, 200);
        assert_eq!(dash.get_task(&task.id).unwrap().status, TaskStatus::Completed);

        let again = dash
            .update_status(&task.id, TaskStatus::Completed, &change.stats, today())
            .unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn update_status_of_missing_task_is_not_found() {
        let mut dash = dashboard();
        let err = dash
            .update_status("nope", TaskStatus::Partial, &UserStats::new(), today())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "task", .. }));
    }

    #[test]
    fn ranked_skips_completed_tasks() {
        let mut dash = dashboard();
        let mut urgent = NewTask::new("Urgent", today());
        urgent.priority = Priority::High;
        let urgent = dash.add_task(urgent).unwrap();
        let later = dash.add_task(NewTask::new("Later", today() + Duration::days(8))).unwrap();
        let done = dash.add_task(NewTask::new("Done", today())).unwrap();
        dash.update_status(&done.id, TaskStatus::Completed, &UserStats::new(), today())
            .unwrap();

        let ids: Vec<_> = dash
            .ranked(today())
            .unwrap()
            .into_iter()
            .map(|r| r.task.id)
            .collect();
        assert_eq!(ids, vec![urgent.id, later.id]);
    }

    #[test]
    fn suggest_uses_task_window() {
        let mut dash = dashboard();
        let task = dash.add_task(NewTask::new("Focus", today())).unwrap();
        let busy = [BusyInterval::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 90)];
        assert_eq!(
            dash.suggest(&task.id, &busy).unwrap(),
            Suggestion::Slot {
                at: NaiveTime::from_hms_opt(10, 30, 0).unwrap()
            }
        );
        assert!(dash.suggest("missing", &busy).is_err());
    }

    #[test]
    fn completion_reads_from_store() {
        let mut dash = dashboard();
        let task = dash.add_task(NewTask::new("Read", today())).unwrap();
        dash.update_status(&task.id, TaskStatus::Partial, &UserStats::new(), today())
            .unwrap();
        let stats = dash.completion(TimeRange::LastWeek, today()).unwrap();
        assert_eq!((stats.partial, stats.total()), (1, 1));
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let mut dash = dashboard();
        let task = dash.add_task(NewTask::new("Temp", today())).unwrap();
        assert!(dash.delete_task(&task.id).unwrap());
        assert!(!dash.delete_task(&task.id).unwrap());
    }
}
