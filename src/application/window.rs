use crate::domain::models::{Preferences, WeeklyEvent};
use crate::domain::time::{normalize_window, parse_time, try_parse_time, MINUTES_PER_DAY};
use serde::Serialize;

/// The `[day_start, day_end)` span being scheduled, in minutes from the
/// midnight before wake. `day_end > day_start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub day_start: i64,
    pub day_end: i64,
    pub wake: i64,
    pub sleep: i64,
    pub crosses_midnight: bool,
}

impl DayWindow {
    /// Resolves the window from wake/sleep and widens it so every weekly event
    /// for the day fits inside.
    pub fn resolve(preferences: &Preferences, todays_events: &[WeeklyEvent]) -> Self {
        let wake = parse_time(&preferences.wake_time);
        let sleep = parse_time(&preferences.sleep_time);
        let crosses_midnight = sleep <= wake;
        let mut window = Self {
            day_start: wake,
            day_end: if crosses_midnight {
                sleep + MINUTES_PER_DAY
            } else {
                sleep
            },
            wake,
            sleep,
            crosses_midnight,
        };

        for event in todays_events {
            if let Some((start, end)) = window.event_span(event) {
                window.day_start = window.day_start.min(start);
                window.day_end = window.day_end.max(end);
            }
        }
        window
    }

    pub fn span(&self) -> i64 {
        self.day_end - self.day_start
    }

    /// Maps a clock pair onto the day timeline.
    pub fn normalize(&self, start: i64, end: i64) -> (i64, i64) {
        normalize_window(start, end, self.wake, self.sleep, self.crosses_midnight)
    }

    /// Clamps a span into the window; the result may be empty.
    pub fn clamp(&self, start: i64, end: i64) -> (i64, i64) {
        (start.max(self.day_start), end.min(self.day_end))
    }

    /// Normalized (unclamped) span of a weekly event, or `None` when either
    /// clock string is malformed.
    pub fn event_span(&self, event: &WeeklyEvent) -> Option<(i64, i64)> {
        let start = try_parse_time(&event.start)?;
        let end = try_parse_time(&event.end)?;
        Some(self.normalize(start, end))
    }
}
