use crate::application::classify::{becomes_focus_block, task_names};
use crate::application::entries::{sort_entries, Entry};
use crate::application::window::DayWindow;
use crate::domain::models::{Preferences, Task};

/// Focus blocks of the preferred length separated by breaks, with any tail
/// shorter than a focus block emitted as free time.
pub fn build_focus_sequence(start: i64, end: i64, preferences: &Preferences) -> Vec<Entry> {
    let focus_len = preferences.focus_minutes();
    let break_len = preferences.break_minutes();

    let mut sequence = Vec::new();
    let mut cursor = start;
    while cursor + focus_len <= end {
        sequence.push(Entry::focus(cursor, cursor + focus_len));
        cursor += focus_len;

        if break_len > 0 && end - cursor >= break_len + focus_len {
            sequence.push(Entry::free_time(cursor, cursor + break_len));
            cursor += break_len;
        }
    }
    if cursor < end {
        sequence.push(Entry::free_time(cursor, end));
    }
    sequence
}

/// Covers `[day_start, day_end)` without gaps. Uncovered time and every
/// entry that classification will settle as a focus block become focus
/// sequences; other entries are kept, cut back where they overlap what came
/// before them.
pub fn fill_gaps(
    entries: Vec<Entry>,
    window: &DayWindow,
    preferences: &Preferences,
    tasks: &[Task],
) -> Vec<Entry> {
    let mut entries = entries;
    sort_entries(&mut entries);
    let names = task_names(tasks);

    let mut filled = Vec::with_capacity(entries.len() * 2);
    let mut cursor = window.day_start;
    for entry in entries {
        let (start, end) = window.clamp(entry.start, entry.end);
        let start = start.max(cursor);
        if end <= start {
            continue;
        }

        if start > cursor {
            filled.extend(build_focus_sequence(cursor, start, preferences));
        }
        if becomes_focus_block(&entry, &names) {
            filled.extend(build_focus_sequence(start, end, preferences));
        } else {
            filled.push(entry.with_span(start, end));
        }
        cursor = end;
    }
    if cursor < window.day_end {
        filled.extend(build_focus_sequence(cursor, window.day_end, preferences));
    }
    filled
}
