//! Calendar import commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::calendar::{collect_events, CalendarSource, JsonFileCalendar};
use std::path::PathBuf;

use super::{print_json, resolve_date, CmdResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Merge exported calendars and drop duplicate events
    Events {
        /// Calendar export (JSON array of events); repeatable
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: CalendarAction) -> CmdResult {
    match action {
        CalendarAction::Events { files, date } => {
            let calendars: Vec<JsonFileCalendar> = files.iter().map(JsonFileCalendar::new).collect();
            let sources: Vec<&dyn CalendarSource> =
                calendars.iter().map(|c| c as &dyn CalendarSource).collect();
            print_json(&collect_events(&sources, resolve_date(date)))?;
        }
    }
    Ok(())
}
