use crate::application::entries::{sort_entries, Entry};
use crate::domain::models::{BlockKind, Task};
use std::collections::HashMap;
use tracing::debug;

/// Lower-cased task name -> configured duration, for tasks with a duration.
pub fn task_duration_map(tasks: &[Task]) -> HashMap<String, i64> {
    tasks
        .iter()
        .filter(|task| task.duration > 0)
        .map(|task| (task.match_key(), i64::from(task.duration)))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Resizes task blocks to their configured duration.
///
/// Growth pushes the following non-fixed entries forward. When the push
/// reaches a fixed entry, every entry in the pushed chain is cut back to that
/// entry's start and the push stops. Tasks are never moved backward.
pub fn apply_task_durations(entries: Vec<Entry>, tasks: &[Task]) -> Vec<Entry> {
    let durations = task_duration_map(tasks);
    if durations.is_empty() {
        return entries;
    }

    let mut entries = entries;
    sort_entries(&mut entries);

    for index in 0..entries.len() {
        let entry = &entries[index];
        if entry.kind.is_fixed() || entry.end <= entry.start {
            continue;
        }
        let title = entry.title.trim().to_lowercase();
        let is_task_type = matches!(entry.kind, BlockKind::Task | BlockKind::Todo);
        if !is_task_type && !durations.contains_key(&title) {
            continue;
        }
        let Some(&duration) = durations.get(&title) else {
            continue;
        };

        let desired_end = entry.start + duration;
        entries[index].end = desired_end;
        push_following(&mut entries, index);
    }

    let mut entries = entries
        .into_iter()
        .filter(|entry| entry.end > entry.start)
        .collect::<Vec<_>>();
    sort_entries(&mut entries);
    entries
}

fn push_following(entries: &mut [Entry], index: usize) {
    let mut tail = index;
    for next in index + 1..entries.len() {
        let current_end = entries[tail].end;
        if entries[next].start >= current_end {
            return;
        }

        if entries[next].kind.is_fixed() {
            let limit = entries[next].start;
            // Entries pushed past the limit collapse onto it so the list stays
            // sorted; they are dropped once every task is resized.
            for pushed in &mut entries[index..next] {
                if pushed.end > limit {
                    pushed.start = pushed.start.min(limit);
                    pushed.end = limit;
                }
            }
            debug!(
                title = %entries[index].title,
                limit,
                "task push stopped at fixed block"
            );
            return;
        }

        let overlap = current_end - entries[next].start;
        entries[next].start += overlap;
        entries[next].end += overlap;
        tail = next;
    }
}
