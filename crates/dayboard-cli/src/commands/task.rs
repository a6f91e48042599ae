//! Task management commands for CLI.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use dayboard_core::{NewTask, Priority, RecurrencePattern, TaskStatus, TaskType, TimeConstraint};
use serde::Serialize;
use std::path::PathBuf;

use super::{busy_for, open_dashboard, parse_clock, print_json, resolve_date, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date, YYYY-MM-DD (default: today)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// regular or daily
        #[arg(long = "type", default_value = "regular")]
        task_type: TaskType,
        /// Pin the task to a time of day (HH:MM)
        #[arg(long, value_parser = parse_clock, conflicts_with_all = ["start", "end"])]
        at: Option<NaiveTime>,
        /// Start of the flexible window (HH:MM)
        #[arg(long, value_parser = parse_clock, requires = "end")]
        start: Option<NaiveTime>,
        /// End of the flexible window (HH:MM)
        #[arg(long, value_parser = parse_clock, requires = "start")]
        end: Option<NaiveTime>,
        /// none, daily, weekdays, weekly or monthly
        #[arg(long, default_value = "none")]
        recurrence: RecurrencePattern,
        /// Estimated duration in minutes (default from config)
        #[arg(long)]
        duration: Option<u32>,
    },
    /// List tasks
    List {
        /// Filter by type (regular or daily)
        #[arg(long = "type")]
        task_type: Option<TaskType>,
    },
    /// Tasks occurring on a date, recurrences included
    Today {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change a task's status and collect points
    Status {
        /// Task ID
        id: String,
        /// not-started, partial or completed
        status: TaskStatus,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Open tasks ordered by priority score
    Rank {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Suggest a start time for a task
    Suggest {
        /// Task ID
        id: String,
        /// Calendar export (JSON array of events); repeatable
        #[arg(long = "calendar")]
        calendars: Vec<PathBuf>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct RankRow {
    id: String,
    title: String,
    due: NaiveDate,
    priority: Priority,
    score: f64,
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        TaskAction::Add {
            title,
            due,
            priority,
            task_type,
            at,
            start,
            end,
            recurrence,
            duration,
        } => {
            let time = match (at, start, end) {
                (Some(at), _, _) => Some(TimeConstraint::Fixed { at }),
                (None, Some(start), Some(end)) => Some(TimeConstraint::flexible(start, end)?),
                _ => None,
            };
            let task = dash.add_task(NewTask {
                title,
                due: resolve_date(due),
                priority,
                task_type,
                time,
                recurrence,
                estimated_duration: duration,
            })?;
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { task_type } => {
            print_json(&dash.list_tasks(task_type)?)?;
        }
        TaskAction::Today { date } => {
            print_json(&dash.tasks_on(resolve_date(date))?)?;
        }
        TaskAction::Status { id, status, date } => {
            let today = resolve_date(date);
            let stats = dash.store().load_user_stats()?;
            match dash.update_status(&id, status, &stats, today)? {
                Some(change) => {
                    dash.store().save_user_stats(&change.stats)?;
                    for achievement in &change.unlocked {
                        eprintln!("Achievement unlocked: {}", achievement.name);
                    }
                    print_json(&change)?;
                }
                None => eprintln!("Task {id} is already {status}"),
            }
        }
        TaskAction::Delete { id } => {
            if dash.delete_task(&id)? {
                println!("Task deleted: {id}");
            } else {
                return Err(format!("task not found: {id}").into());
            }
        }
        TaskAction::Rank { date } => {
            let rows: Vec<RankRow> = dash
                .ranked(resolve_date(date))?
                .into_iter()
                .map(|r| RankRow {
                    score: (r.score.total * 10.0).round() / 10.0,
                    id: r.task.id,
                    title: r.task.title,
                    due: r.task.due,
                    priority: r.task.priority,
                })
                .collect();
            print_json(&rows)?;
        }
        TaskAction::Suggest {
            id,
            calendars,
            date,
        } => {
            let day = resolve_date(date);
            let tasks = dash.tasks_on(day)?;
            let busy = busy_for(&calendars, &tasks, day);
            print_json(&dash.suggest(&id, &busy)?)?;
        }
    }
    Ok(())
}
