//! # Dayboard Core Library
//!
//! This library provides the core logic of Dayboard, a personal productivity
//! dashboard. Everything here is synchronous and deterministic given its
//! inputs; the caller supplies "today" and owns any persisted state.
//!
//! ## Architecture
//!
//! - **Calendar**: Event parsing, calendar sources and deduplication
//! - **Timeline**: Free slot detection and priority scoring
//! - **Stats**: Completion aggregation and trend views
//! - **Gamification**: Points, streaks and achievements driven by status changes
//! - **Storage**: SQLite task storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Dashboard`]: Store-backed facade used by the CLI
//! - [`GamificationEngine`]: Status-change state machine over [`UserStats`]
//! - [`SlotFinder`]: Free window search between busy intervals
//! - [`PriorityScorer`]: 0-100 task scoring
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod gamification;
pub mod service;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timeline;

pub use calendar::{busy_intervals, collect_events, deduplicate, CalendarEvent, CalendarSource};
pub use error::{CalendarError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use gamification::{
    calculate_points, check_achievements, update_streak, Achievement, AchievementId,
    GamificationEngine, StatusChange, UserStats,
};
pub use service::{Dashboard, NewTask, RankedTask};
pub use stats::{aggregate_completion, CompletionStats, TimeRange};
pub use storage::{Config, InMemoryTaskStore, TaskDb, TaskStore};
pub use task::{Priority, RecurrencePattern, Task, TaskRecord, TaskStatus, TaskType, TimeConstraint};
pub use timeline::{
    find_free_slots, rank_tasks, score_task, BusyInterval, PriorityScorer, SlotFinder, Suggestion,
};
