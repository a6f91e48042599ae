//! Scheduling helpers.
//!
//! This module provides:
//! - Free slot detection between busy intervals
//! - Priority scoring and ranking of tasks
//! - Start-time suggestions for fixed and flexible tasks

mod priority;
mod slots;
mod suggest;

pub use priority::{
    rank_tasks, score_task, PriorityLevelWeights, PriorityScorer, ScoreBreakdown, ScoringWeights,
};
pub use slots::{find_free_slots, BusyInterval, FreeWindow, SlotFinder};
pub use suggest::{suggest_task_time, Suggestion};
