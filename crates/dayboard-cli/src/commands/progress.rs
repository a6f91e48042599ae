//! Points, streaks and achievements.

use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::gamification::AchievementChecker;
use dayboard_core::Achievement;
use serde::Serialize;

use super::{open_dashboard, print_json, resolve_date, CmdResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show points, streaks and unlocked achievements
    Show,
    /// Achievements not yet unlocked and whether today's tasks qualify
    Achievements {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Clear all progress
    Reset,
}

#[derive(Serialize)]
struct AchievementRow {
    #[serde(flatten)]
    achievement: Achievement,
    unlocked: bool,
    ready: bool,
}

pub fn run(action: ProgressAction) -> CmdResult {
    let dash = open_dashboard()?;

    match action {
        ProgressAction::Show => {
            print_json(&dash.store().load_user_stats()?)?;
        }
        ProgressAction::Achievements { date } => {
            let stats = dash.store().load_user_stats()?;
            let tasks = dash.list_tasks(None)?;
            let checker = AchievementChecker::with_thresholds(dash.config().achievements.clone());
            let ready = checker.pending(&stats, &tasks, resolve_date(date));
            let rows: Vec<AchievementRow> = checker
                .all()
                .into_iter()
                .map(|achievement| AchievementRow {
                    unlocked: stats.has_achievement(achievement.id),
                    ready: ready.iter().any(|a| a.id == achievement.id),
                    achievement,
                })
                .collect();
            print_json(&rows)?;
        }
        ProgressAction::Reset => {
            dash.store().clear_user_stats()?;
            println!("progress reset");
        }
    }
    Ok(())
}
