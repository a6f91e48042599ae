//! Cross-source duplicate removal for calendar events.

use std::collections::HashSet;

use super::CalendarEvent;

/// Remove events sharing `(title, start_time)`, keeping the first seen, and
/// return the survivors ordered by parsed start time.
///
/// Matching is exact; no fuzzy title comparison is attempted. Events whose
/// `start_time` does not parse as `HH:MM` are kept and placed ahead of every
/// valid event, ordered by their raw text. The sort is stable, so events with
/// the same start keep their input order.
pub fn deduplicate(events: impl IntoIterator<Item = CalendarEvent>) -> Vec<CalendarEvent> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique: Vec<CalendarEvent> = events
        .into_iter()
        .filter(|event| seen.insert((event.title.clone(), event.start_time.clone())))
        .collect();

    // Parsed time first so "9:00" sorts before "10:00"; unparseable starts lead.
    unique.sort_by_cached_key(|event| (event.start().ok(), event.start_time.clone()));
    unique
}
