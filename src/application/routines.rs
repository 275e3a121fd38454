use crate::application::entries::{carve, Entry};
use crate::application::window::DayWindow;
use crate::domain::models::{BlockKind, Preferences};

pub const MORNING_ROUTINE_TITLE: &str = "Morning Routine";
pub const EVENING_ROUTINE_TITLE: &str = "Evening Routine";

/// Morning and evening lengths fitted into a window of `span` minutes.
///
/// Both lengths are scaled down proportionally when they do not fit; any
/// remaining overflow comes out of the evening first, then the morning. Each
/// stays at one minute or more.
pub fn routine_lengths(span: i64, morning: i64, evening: i64) -> (i64, i64) {
    let mut morning = morning.max(1);
    let mut evening = evening.max(1);
    if span <= 0 {
        return (0, 0);
    }

    let total = morning + evening;
    if total > span {
        morning = ((morning * span * 2 + total) / (total * 2)).max(1);
        evening = ((evening * span * 2 + total) / (total * 2)).max(1);
    }

    if morning + evening > span {
        let mut overflow = morning + evening - span;
        let reduce_evening = overflow.min((evening - 1).max(0));
        evening -= reduce_evening;
        overflow -= reduce_evening;
        if overflow > 0 && morning > 1 {
            morning -= overflow.min(morning - 1);
        }
    }
    (morning, evening)
}

/// Replaces any routine entries with fresh ones pinned to the window edges.
///
/// Routine spans are trimmed so they never cover a weekly event.
pub fn ensure_routines(
    entries: Vec<Entry>,
    window: &DayWindow,
    preferences: &Preferences,
) -> Vec<Entry> {
    let span = window.span();
    if span <= 0 {
        return entries;
    }

    let (morning_len, evening_len) = routine_lengths(
        span,
        preferences.morning_routine_minutes(),
        preferences.evening_routine_minutes(),
    );

    let mut morning_end = (window.day_start + morning_len).min(window.day_end);
    if window.day_end - morning_end < 1 {
        morning_end = window.day_start.max(window.day_end - 1);
    }

    let remaining = (window.day_end - morning_end).max(0);
    let evening_len = if remaining >= 1 {
        evening_len.min(remaining).max(1)
    } else {
        0
    };
    let mut evening_start = (window.day_end - evening_len).max(morning_end);

    let mut entries = entries
        .into_iter()
        .filter(|entry| !entry.kind.is_routine())
        .collect::<Vec<_>>();

    for event in entries
        .iter()
        .filter(|entry| entry.kind == BlockKind::WeeklyEvent)
    {
        if event.overlaps(window.day_start, morning_end) {
            morning_end = morning_end.min(event.start);
        }
        if event.overlaps(evening_start, window.day_end) {
            evening_start = evening_start.max(event.end);
        }
    }

    if morning_end > window.day_start {
        entries = carve(
            entries,
            Entry::new(
                window.day_start,
                morning_end,
                BlockKind::MorningRoutine,
                MORNING_ROUTINE_TITLE,
                false,
            ),
        );
    }
    if evening_start < window.day_end {
        entries = carve(
            entries,
            Entry::new(
                evening_start,
                window.day_end,
                BlockKind::EveningRoutine,
                EVENING_ROUTINE_TITLE,
                false,
            ),
        );
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(day_start: i64, day_end: i64) -> DayWindow {
        DayWindow {
            day_start,
            day_end,
            wake: day_start,
            sleep: day_end,
            crosses_midnight: false,
        }
    }

    fn routine_spans(entries: &[Entry]) -> Vec<(i64, i64, BlockKind)> {
        entries
            .iter()
            .filter(|entry| entry.kind.is_routine())
            .map(|entry| (entry.start, entry.end, entry.kind.clone()))
            .collect()
    }

    #[test]
    fn default_routines_sit_at_both_edges() {
        let entries = ensure_routines(
            vec![Entry::focus(420, 600)],
            &window(420, 1380),
            &Preferences::default(),
        );
        assert_eq!(
            routine_spans(&entries),
            vec![
                (420, 450, BlockKind::MorningRoutine),
                (1350, 1380, BlockKind::EveningRoutine),
            ]
        );
        assert_eq!((entries[1].start, entries[1].end), (450, 600));
    }

    #[test]
    fn stale_routines_are_replaced() {
        let stale = Entry::new(
            500,
            560,
            BlockKind::MorningRoutine,
            MORNING_ROUTINE_TITLE,
            false,
        );
        let entries = ensure_routines(vec![stale], &window(420, 1380), &Preferences::default());
        assert_eq!(routine_spans(&entries).len(), 2);
        assert!(entries.iter().all(|entry| entry.start != 500));
    }

    #[test]
    fn lengths_scale_down_in_a_short_window() {
        assert_eq!(routine_lengths(40, 30, 30), (20, 20));
        assert_eq!(routine_lengths(30, 60, 30), (20, 10));
        assert_eq!(routine_lengths(2, 30, 30), (1, 1));
        assert_eq!(routine_lengths(1, 30, 30), (1, 1));
    }

    #[test]
    fn routines_do_not_cover_weekly_events() {
        let early = Entry::new(410, 440, BlockKind::WeeklyEvent, "Early gym", false);
        let late = Entry::new(1340, 1365, BlockKind::WeeklyEvent, "Late call", false);
        let entries = ensure_routines(
            vec![early.clone(), late.clone()],
            &window(400, 1380),
            &Preferences::default(),
        );

        assert!(entries.contains(&early));
        assert!(entries.contains(&late));
        assert_eq!(
            routine_spans(&entries),
            vec![
                (400, 410, BlockKind::MorningRoutine),
                (1365, 1380, BlockKind::EveningRoutine),
            ]
        );
    }

    #[test]
    fn routine_is_skipped_when_an_event_holds_its_edge() {
        let event = Entry::new(420, 480, BlockKind::WeeklyEvent, "Swim", false);
        let entries = ensure_routines(vec![event], &window(420, 1380), &Preferences::default());
        assert_eq!(
            routine_spans(&entries),
            vec![(1350, 1380, BlockKind::EveningRoutine)]
        );
    }

    #[test]
    fn one_minute_window_keeps_only_the_evening_routine() {
        let entries = ensure_routines(Vec::new(), &window(420, 421), &Preferences::default());
        assert_eq!(
            routine_spans(&entries),
            vec![(420, 421, BlockKind::EveningRoutine)]
        );
    }

    proptest! {
        #[test]
        fn routine_lengths_never_overflow_the_window(
            span in 2i64..2000,
            morning in 0i64..600,
            evening in 0i64..600,
        ) {
            let (morning, evening) = routine_lengths(span, morning, evening);
            prop_assert!(morning >= 1);
            prop_assert!(evening >= 1);
            prop_assert!(morning + evening <= span);
        }
    }
}
