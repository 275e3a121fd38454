//! Final reclassification of filler and unrecognized block types into the
//! canonical vocabulary.

use crate::application::entries::{Entry, FOCUS_BLOCK_TITLE, FREE_TIME_TITLE};
use crate::application::routines::{EVENING_ROUTINE_TITLE, MORNING_ROUTINE_TITLE};
use crate::application::weekly_events::WEEKLY_EVENT_TITLE;
use crate::domain::models::{BlockKind, Task};
use std::collections::HashSet;

const FILLER_KEYWORDS: [&str; 17] = [
    "free",
    "personal",
    "project",
    "buffer",
    "catch",
    "admin",
    "rest",
    "recovery",
    "flex",
    "exercise",
    "movement",
    "leisure",
    "downtime",
    "placeholder",
    "unwind",
    "relax",
    "misc",
];
const MEAL_TITLE: &str = "Meal";
const BREAK_TITLE: &str = "Break";

/// Trimmed, lowercased task names as matched against entry titles.
pub fn task_names(tasks: &[Task]) -> HashSet<String> {
    tasks
        .iter()
        .map(Task::match_key)
        .filter(|name| !name.is_empty())
        .collect()
}

fn mentions_task(title: &str) -> bool {
    title.contains("todo") || title.contains("task")
}

/// Whether the sanitizer followed by the normalizer will settle `entry` as a
/// required focus block.
pub fn becomes_focus_block(entry: &Entry, names: &HashSet<String>) -> bool {
    let settled = normalize_entry(sanitize_entry(entry.clone(), names), names);
    settled.kind == BlockKind::FocusBlock
}

/// Turns unprotected filler entries into free time or focus blocks, and
/// entries named after a task into todos.
pub fn sanitize_filler_entries(entries: Vec<Entry>, tasks: &[Task]) -> Vec<Entry> {
    let names = task_names(tasks);
    entries
        .into_iter()
        .map(|entry| sanitize_entry(entry, &names))
        .collect()
}

fn sanitize_entry(mut entry: Entry, names: &HashSet<String>) -> Entry {
    let protected = matches!(
        entry.kind,
        BlockKind::Meal
            | BlockKind::WeeklyEvent
            | BlockKind::MorningRoutine
            | BlockKind::EveningRoutine
            | BlockKind::FocusBlock
    );
    if protected || entry.focus_required || entry.kind.is_task_like() {
        return entry;
    }

    let title = entry.title.trim().to_string();
    let title_lower = title.to_lowercase();
    if mentions_task(&title_lower) {
        return entry;
    }
    if names.contains(&title_lower) {
        entry.kind = BlockKind::Todo;
        return entry;
    }

    let kind = entry.kind.as_str().to_string();
    let is_filler = FILLER_KEYWORDS
        .iter()
        .any(|keyword| kind.contains(keyword) || title_lower.contains(keyword));
    if !is_filler {
        return entry;
    }

    if kind.contains("free") || title_lower.contains("free") {
        entry.kind = BlockKind::FreeTime;
        entry.title = if title.is_empty() {
            FREE_TIME_TITLE.to_string()
        } else {
            title
        };
        entry.focus_required = false;
    } else {
        entry.kind = BlockKind::FocusBlock;
        entry.title = FOCUS_BLOCK_TITLE.to_string();
        entry.focus_required = true;
    }
    entry
}

/// Forces every entry into the canonical vocabulary. Anything that is not a
/// meal, event, routine, break, free time or task becomes a required focus
/// block.
pub fn normalize_entry_types(entries: Vec<Entry>, tasks: &[Task]) -> Vec<Entry> {
    let names = task_names(tasks);
    entries
        .into_iter()
        .map(|entry| normalize_entry(entry, &names))
        .collect()
}

fn normalize_entry(mut entry: Entry, names: &HashSet<String>) -> Entry {
    let title = entry.title.trim().to_string();
    let default_title = match entry.kind {
        BlockKind::FreeTime => Some(FREE_TIME_TITLE),
        BlockKind::Break => Some(BREAK_TITLE),
        BlockKind::Meal => Some(MEAL_TITLE),
        BlockKind::WeeklyEvent => Some(WEEKLY_EVENT_TITLE),
        BlockKind::MorningRoutine => Some(MORNING_ROUTINE_TITLE),
        BlockKind::EveningRoutine => Some(EVENING_ROUTINE_TITLE),
        _ => None,
    };
    if let Some(default_title) = default_title {
        entry.focus_required = false;
        if title.is_empty() {
            entry.title = default_title.to_string();
        }
        return entry;
    }

    if entry.kind.is_task_like() {
        if !matches!(entry.kind, BlockKind::Task) {
            entry.kind = BlockKind::Todo;
        }
        return entry;
    }

    let title_lower = title.to_lowercase();
    if names.contains(&title_lower) || mentions_task(&title_lower) {
        entry.kind = BlockKind::Todo;
        return entry;
    }

    entry.kind = BlockKind::FocusBlock;
    entry.title = if title.is_empty() {
        FOCUS_BLOCK_TITLE.to_string()
    } else {
        title
    };
    entry.focus_required = true;
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Priority;

    fn tasks() -> Vec<Task> {
        vec![Task {
            name: "Essay".to_string(),
            duration: 45,
            priority: Priority::High,
        }]
    }

    fn entry(kind: &str, title: &str, focus_required: bool) -> Entry {
        Entry::new(0, 30, BlockKind::parse(kind), title, focus_required)
    }

    fn sanitized(kind: &str, title: &str) -> Entry {
        sanitize_filler_entries(vec![entry(kind, title, false)], &tasks()).remove(0)
    }

    fn normalized(kind: &str, title: &str) -> Entry {
        normalize_entry_types(vec![entry(kind, title, false)], &tasks()).remove(0)
    }

    #[test]
    fn task_titles_become_todos() {
        let result = sanitized("study", " essay ");
        assert_eq!(result.kind, BlockKind::Todo);
        assert_eq!(result.title, " essay ");
    }

    #[test]
    fn filler_keywords_become_focus_blocks() {
        let result = sanitized("admin", "Inbox");
        assert_eq!(result.kind, BlockKind::FocusBlock);
        assert_eq!(result.title, FOCUS_BLOCK_TITLE);
        assert!(result.focus_required);

        let result = sanitized("misc", "Catch up");
        assert_eq!(result.kind, BlockKind::FocusBlock);
    }

    #[test]
    fn free_keyword_becomes_free_time() {
        let result = sanitized("buffer", "Free afternoon");
        assert_eq!(result.kind, BlockKind::FreeTime);
        assert_eq!(result.title, "Free afternoon");
        assert!(!result.focus_required);

        let result = sanitized("free_slot", "");
        assert_eq!(result.title, FREE_TIME_TITLE);
    }

    #[test]
    fn protected_and_required_entries_are_untouched() {
        let meal = sanitized("meal", "Rest stop");
        assert_eq!(meal.kind, BlockKind::Meal);
        assert_eq!(meal.title, "Rest stop");

        let required = sanitize_filler_entries(vec![entry("buffer", "Flex", true)], &tasks());
        assert_eq!(required[0].kind, BlockKind::Other("buffer".to_string()));

        let todo = sanitized("chore", "Buffer todo list");
        assert_eq!(todo.kind, BlockKind::Other("chore".to_string()));
    }

    #[test]
    fn unknown_types_normalize_to_focus_blocks() {
        let result = normalized("study", "");
        assert_eq!(result.kind, BlockKind::FocusBlock);
        assert_eq!(result.title, FOCUS_BLOCK_TITLE);
        assert!(result.focus_required);

        let placeholder = normalized("focus_placeholder", "Deep work");
        assert_eq!(placeholder.kind, BlockKind::FocusBlock);
        assert_eq!(placeholder.title, "Deep work");
    }

    #[test]
    fn fixed_and_rest_types_get_default_titles() {
        assert_eq!(normalized("meal", "").title, MEAL_TITLE);
        assert_eq!(normalized("weekly_event", " ").title, WEEKLY_EVENT_TITLE);
        assert_eq!(normalized("evening_routine", "").title, EVENING_ROUTINE_TITLE);
        assert_eq!(normalized("free_time", "").title, FREE_TIME_TITLE);
        let pause = normalize_entry_types(vec![entry("break", "", true)], &tasks()).remove(0);
        assert_eq!(pause.kind, BlockKind::Break);
        assert_eq!(pause.title, BREAK_TITLE);
        assert!(!pause.focus_required);
    }

    #[test]
    fn focus_outcome_matches_both_passes() {
        let names = task_names(&tasks());
        for (kind, title, expected) in [
            ("buffer", "Buffer", true),
            ("study", "", true),
            ("focus_placeholder", "Focus Block", true),
            ("focus_block", "Deep work", true),
            ("focus_block", "Essay", false),
            ("buffer", "Free afternoon", false),
            ("break", "", false),
            ("task", "Essay", false),
            ("meal", "Lunch", false),
            ("chore", "Buffer todo list", false),
        ] {
            let candidate = entry(kind, title, false);
            let settled = normalize_entry_types(
                sanitize_filler_entries(vec![candidate.clone()], &tasks()),
                &tasks(),
            );
            assert_eq!(becomes_focus_block(&candidate, &names), expected, "{kind}/{title}");
            assert_eq!(settled[0].kind == BlockKind::FocusBlock, expected, "{kind}/{title}");
        }
    }

    #[test]
    fn task_like_types_normalize_to_todo() {
        assert_eq!(normalized("task_reading", "Chapter 3").kind, BlockKind::Todo);
        assert_eq!(normalized("task", "Chapter 3").kind, BlockKind::Task);
        assert_eq!(normalized("study", "Essay").kind, BlockKind::Todo);
        assert_eq!(normalized("study", "Write task list").kind, BlockKind::Todo);
    }
}
