//! Free slot detection between busy intervals.
//!
//! Finds where a flexible task of a given length can start inside its
//! permitted window without touching an existing event.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes since midnight. Values past 1440 mean "the next day".
fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn time_from_minute(minute: i64) -> NaiveTime {
    let minute = minute.rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0).unwrap_or_default()
}

/// A period already taken by a calendar event or a fixed-time task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

impl BusyInterval {
    pub fn new(start: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    fn start_minute(&self) -> i64 {
        minute_of_day(self.start)
    }

    /// End offset in minutes since midnight; may run past midnight.
    fn end_minute(&self) -> i64 {
        self.start_minute() + i64::from(self.duration_minutes)
    }

    /// Wall-clock end (wraps past midnight).
    pub fn end(&self) -> NaiveTime {
        time_from_minute(self.end_minute())
    }

    /// Whether `[start, start + minutes)` intersects this interval.
    pub fn overlaps(&self, start: NaiveTime, minutes: u32) -> bool {
        let s = minute_of_day(start);
        let e = s + i64::from(minutes);
        s < self.end_minute() && self.start_minute() < e
    }
}

/// A free stretch inside the search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_minutes: u32,
}

impl FreeWindow {
    fn new(start_minute: i64, end_minute: i64) -> Self {
        Self {
            start: time_from_minute(start_minute),
            end: time_from_minute(end_minute),
            duration_minutes: (end_minute - start_minute).max(0) as u32,
        }
    }

    /// Check if this window can fit a task of given duration
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes >= minutes
    }
}

/// Walks busy intervals in start order to find free windows.
#[derive(Debug, Clone, Default)]
pub struct SlotFinder {
    busy: Vec<BusyInterval>,
}

impl SlotFinder {
    /// Create a finder over the given busy intervals (any order).
    pub fn new(busy: &[BusyInterval]) -> Self {
        let mut busy = busy.to_vec();
        busy.sort_by_key(|interval| interval.start);
        Self { busy }
    }

    /// Free windows inside `[window_start, window_end)`.
    ///
    /// The cursor only moves forward: an interval that starts before the
    /// cursor (overlap) can extend it but never pull it back.
    pub fn free_windows(&self, window_start: NaiveTime, window_end: NaiveTime) -> Vec<FreeWindow> {
        let start = minute_of_day(window_start);
        let end = minute_of_day(window_end);
        if end <= start {
            return Vec::new();
        }

        let mut windows = Vec::new();
        let mut cursor = start;

        for interval in &self.busy {
            let gap_end = interval.start_minute().min(end);
            if gap_end > cursor {
                windows.push(FreeWindow::new(cursor, gap_end));
            }
            cursor = cursor.max(interval.end_minute());
            if cursor >= end {
                break;
            }
        }

        if end > cursor {
            windows.push(FreeWindow::new(cursor, end));
        }

        windows
    }

    /// Start times of every free window that fits `required_minutes`,
    /// earliest first. Empty means nothing fits.
    pub fn find_slots(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
        required_minutes: u32,
    ) -> Vec<NaiveTime> {
        let slots: Vec<NaiveTime> = self
            .free_windows(window_start, window_end)
            .into_iter()
            .filter(|window| window.can_fit(required_minutes))
            .map(|window| window.start)
            .collect();

        tracing::debug!(
            busy = self.busy.len(),
            required_minutes,
            found = slots.len(),
            "searched for free slots"
        );
        slots
    }

    /// The default suggestion: the earliest slot, if any.
    pub fn earliest_slot(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
        required_minutes: u32,
    ) -> Option<NaiveTime> {
        self.find_slots(window_start, window_end, required_minutes)
            .into_iter()
            .next()
    }
}

/// Candidate start times inside `[window_start, window_end)` with at least
/// `required_minutes` free before the next busy interval or the window end.
pub fn find_free_slots(
    busy: &[BusyInterval],
    window_start: NaiveTime,
    window_end: NaiveTime,
    required_minutes: u32,
) -> Vec<NaiveTime> {
    SlotFinder::new(busy).find_slots(window_start, window_end, required_minutes)
}
