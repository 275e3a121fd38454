use crate::application::entries::{carve, Entry};
use crate::application::window::DayWindow;
use crate::domain::models::{BlockKind, WeeklyEvent};
use crate::domain::time::parse_weekday;
use chrono::Weekday;
use tracing::debug;

pub const WEEKLY_EVENT_TITLE: &str = "Weekly Event";
const MIN_EVENT_MINUTES: i64 = 5;

/// Events recurring on `weekday`, in input order.
pub fn events_for_day(events: &[WeeklyEvent], weekday: Weekday) -> Vec<WeeklyEvent> {
    events
        .iter()
        .filter(|event| parse_weekday(&event.day) == Some(weekday))
        .cloned()
        .collect()
}

/// Carves each of today's events into the entry list, one at a time and in
/// input order. Whatever an event overlaps is split around it.
pub fn enforce_weekly_events(
    entries: Vec<Entry>,
    todays_events: &[WeeklyEvent],
    window: &DayWindow,
) -> Vec<Entry> {
    let mut entries = entries;
    for event in todays_events {
        let Some((start, end)) = window.event_span(event) else {
            debug!(title = %event.title, "skipping weekly event with malformed time");
            continue;
        };
        let (start, end) = window.clamp(start, end);
        if end - start < MIN_EVENT_MINUTES {
            debug!(title = %event.title, "skipping weekly event shorter than five minutes");
            continue;
        }

        let title = match event.title.trim() {
            "" => WEEKLY_EVENT_TITLE,
            _ => event.title.as_str(),
        };
        entries = carve(
            entries,
            Entry::new(start, end, BlockKind::WeeklyEvent, title, false),
        );
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Preferences;

    fn event(day: &str, start: &str, end: &str, title: &str) -> WeeklyEvent {
        WeeklyEvent {
            day: day.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            title: title.to_string(),
        }
    }

    fn window_for(events: &[WeeklyEvent]) -> DayWindow {
        DayWindow::resolve(&Preferences::default(), events)
    }

    #[test]
    fn events_for_day_filters_by_weekday() {
        let events = vec![
            event("Monday", "10:00", "11:30", "Physics Lecture"),
            event("tue", "09:00", "10:00", "Lab"),
            event("monday", "14:00", "15:00", "Seminar"),
            event("Someday", "14:00", "15:00", "Never"),
        ];
        let todays = events_for_day(&events, Weekday::Mon);
        let titles = todays.iter().map(|event| event.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Physics Lecture", "Seminar"]);
    }

    #[test]
    fn event_carves_overlapping_blocks() {
        let events = vec![event("Monday", "10:00", "11:30", "Physics Lecture")];
        let window = window_for(&events);
        let entries = vec![Entry::focus(540, 660), Entry::free_time(660, 720)];

        let enforced = enforce_weekly_events(entries, &events, &window);
        let spans = enforced
            .iter()
            .map(|entry| (entry.start, entry.end, entry.kind.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            spans,
            vec![
                (540, 600, BlockKind::FocusBlock),
                (600, 690, BlockKind::WeeklyEvent),
                (690, 720, BlockKind::FreeTime),
            ]
        );
        assert_eq!(enforced[1].title, "Physics Lecture");
        assert!(!enforced[1].focus_required);
    }

    #[test]
    fn short_malformed_and_untitled_events() {
        let events = vec![
            event("Monday", "10:00", "10:03", "Too short"),
            event("Monday", "nope", "10:30", "Broken"),
            event("Monday", "12:00", "13:00", "  "),
        ];
        let window = window_for(&events);
        let enforced = enforce_weekly_events(Vec::new(), &events, &window);

        assert_eq!(enforced.len(), 1);
        assert_eq!(enforced[0].title, WEEKLY_EVENT_TITLE);
        assert_eq!((enforced[0].start, enforced[0].end), (720, 780));
    }

    #[test]
    fn later_event_carves_an_earlier_overlapping_one() {
        let events = vec![
            event("Monday", "10:00", "11:00", "First"),
            event("Monday", "10:30", "11:30", "Second"),
        ];
        let window = window_for(&events);
        let enforced = enforce_weekly_events(Vec::new(), &events, &window);

        assert_eq!(enforced.len(), 2);
        assert_eq!((enforced[0].start, enforced[0].end), (600, 630));
        assert_eq!(enforced[1].title, "Second");
    }
}
