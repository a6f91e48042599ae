//! Task priority scoring.
//!
//! Scores tasks on a 0-100 scale from three factors:
//! - User priority (High/Medium/Low mapped through a weight)
//! - Urgency (due today or overdue = 100, losing 10 points per day out)
//! - Duration (shorter tasks score higher)
//!
//! Scores are only used for ranking and suggestions; they are never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

/// Weight given to each user priority level (0.0-1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityLevelWeights {
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_medium")]
    pub medium: f64,
    #[serde(default = "default_low")]
    pub low: f64,
}

fn default_high() -> f64 {
    1.0
}
fn default_medium() -> f64 {
    0.7
}
fn default_low() -> f64 {
    0.4
}

impl Default for PriorityLevelWeights {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
        }
    }
}

impl PriorityLevelWeights {
    pub fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Weights of the three score components; they should sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for user priority (default 0.4)
    #[serde(default = "default_component_weight")]
    pub priority_weight: f64,
    /// Weight for deadline urgency (default 0.4)
    #[serde(default = "default_component_weight")]
    pub urgency_weight: f64,
    /// Weight for duration (default 0.2)
    #[serde(default = "default_duration_weight")]
    pub duration_weight: f64,
    #[serde(default)]
    pub levels: PriorityLevelWeights,
}

fn default_component_weight() -> f64 {
    0.4
}
fn default_duration_weight() -> f64 {
    0.2
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            priority_weight: default_component_weight(),
            urgency_weight: default_component_weight(),
            duration_weight: default_duration_weight(),
            levels: PriorityLevelWeights::default(),
        }
    }
}

/// Per-component breakdown of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub priority: f64,
    pub urgency: f64,
    pub duration: f64,
    pub total: f64,
}

/// Priority scorer for tasks.
#[derive(Debug, Clone, Default)]
pub struct PriorityScorer {
    weights: ScoringWeights,
}

impl PriorityScorer {
    /// Create a scorer with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Priority component (0-100).
    fn priority_component(&self, task: &Task) -> f64 {
        self.weights.levels.weight(task.priority) * 100.0
    }

    /// Urgency component (0-100).
    ///
    /// - Due today or overdue: 100
    /// - Otherwise 100 - 10 per day remaining, reaching 0 at 10+ days out
    fn urgency_component(&self, task: &Task, today: NaiveDate) -> f64 {
        let days_until_due = (task.due - today).num_days();
        if days_until_due <= 0 {
            100.0
        } else {
            (100.0 - days_until_due as f64 * 10.0).max(0.0)
        }
    }

    /// Duration component (0-100): one point lost per 15 minutes, capped.
    fn duration_component(&self, task: &Task) -> f64 {
        100.0 - (f64::from(task.estimated_duration) / 15.0).min(100.0)
    }

    /// Score with each component exposed.
    pub fn breakdown(&self, task: &Task, today: NaiveDate) -> ScoreBreakdown {
        let priority = self.priority_component(task);
        let urgency = self.urgency_component(task, today);
        let duration = self.duration_component(task);

        let total = priority * self.weights.priority_weight
            + urgency * self.weights.urgency_weight
            + duration * self.weights.duration_weight;

        ScoreBreakdown {
            priority,
            urgency,
            duration,
            total: total.clamp(0.0, 100.0),
        }
    }

    /// Score a task (0-100) as of `today`.
    pub fn score(&self, task: &Task, today: NaiveDate) -> f64 {
        self.breakdown(task, today).total
    }

    /// `(task_id, score)` pairs, highest score first. Ties keep input order.
    pub fn rank(&self, tasks: &[Task], today: NaiveDate) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = tasks
            .iter()
            .map(|task| (task.id.clone(), self.score(task, today)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Score a single task with default weights.
pub fn score_task(task: &Task, today: NaiveDate) -> f64 {
    PriorityScorer::new().score(task, today)
}

/// Rank tasks with default weights.
pub fn rank_tasks(tasks: &[Task], today: NaiveDate) -> Vec<(String, f64)> {
    PriorityScorer::new().rank(tasks, today)
}
