//! Meal coverage: places exactly the requested number of meals near realistic
//! times of day, relaxing the spacing requirement step by step when the day is
//! crowded.

use crate::application::entries::{carve, sort_entries, Entry, FOCUS_BLOCK_TITLE};
use crate::application::window::DayWindow;
use crate::domain::models::BlockKind;
use serde::Serialize;
use tracing::{debug, warn};

/// Minimum minutes between meals, tried in order until a placement succeeds.
pub const MEAL_MIN_GAPS: [i64; 4] = [35, 30, 25, 20];
pub const MEAL_MINUTES: i64 = 30;
pub const MIN_MEAL_MINUTES: i64 = 20;
const SNAP_MINUTES: i64 = 5;
const MIN_REMAINDER_MINUTES: i64 = 5;
const FILLER_KEYWORDS: [&str; 11] = [
    "free",
    "rest",
    "buffer",
    "flex",
    "break",
    "personal",
    "catch",
    "admin",
    "exercise",
    "transition",
    "placeholder",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MealReport {
    pub requested: usize,
    pub placed: usize,
}

impl MealReport {
    pub fn is_complete(&self) -> bool {
        self.placed >= self.requested
    }
}

pub fn expected_meal_titles(count: usize) -> Vec<String> {
    let titles: &[&str] = match count {
        1 => &["Main Meal"],
        2 => &["Breakfast", "Dinner"],
        3 => &["Breakfast", "Lunch", "Dinner"],
        4 => &["Breakfast", "Snack/Brunch", "Lunch", "Dinner"],
        5 => &[
            "Breakfast",
            "Mid-morning Snack",
            "Lunch",
            "Afternoon Snack",
            "Dinner",
        ],
        6 => &[
            "Breakfast",
            "Mid-morning Snack",
            "Lunch",
            "Afternoon Snack",
            "Dinner",
            "Evening Snack",
        ],
        _ => {
            return (1..=count).map(|index| format!("Meal {index}")).collect();
        }
    };
    titles.iter().map(|title| title.to_string()).collect()
}

/// Day fractions for each meal, in thousandths of the day span.
pub fn meal_ratios(count: usize) -> Vec<i64> {
    let ratios: &[i64] = match count {
        0 => &[],
        1 => &[500],
        2 => &[50, 750],
        3 => &[50, 500, 820],
        4 => &[40, 250, 550, 820],
        5 => &[40, 220, 450, 680, 880],
        6 => &[40, 200, 380, 580, 780, 900],
        _ => {
            let step_divisor = (count as i64 - 1).max(1);
            return (0..count as i64)
                .map(|index| (index * 850 / step_divisor).min(900))
                .collect();
        }
    };
    ratios.to_vec()
}

/// Target start minute of meal `index` out of `total`, clamped so a full meal
/// fits before the end of the day and rounded down to five minutes.
pub fn meal_target(index: usize, total: usize, window: &DayWindow) -> i64 {
    if total == 0 {
        return window.day_start;
    }
    let ratio = meal_ratios(total)
        .get(index)
        .copied()
        .unwrap_or_else(|| index as i64 * 1000 / (total as i64 - 1).max(1))
        .clamp(0, 950);
    let span = window.span().max(1);
    let target = window.day_start + span * ratio / 1000;
    let target = window.day_start.max(target.min(window.day_end - MEAL_MINUTES));
    target - target.rem_euclid(SNAP_MINUTES)
}

/// Gaps of at least a minimum meal between the entries that hold time.
/// Former meal placeholders do not hold time.
pub fn free_segments(entries: &[Entry], window: &DayWindow) -> Vec<(i64, i64)> {
    let mut occupied = entries
        .iter()
        .filter(|entry| entry.kind != BlockKind::FocusPlaceholder)
        .map(|entry| (entry.start, entry.end))
        .collect::<Vec<_>>();
    occupied.sort_by_key(|(start, _)| *start);

    let mut segments = Vec::new();
    let mut cursor = window.day_start;
    for (start, end) in occupied {
        if start - cursor >= MIN_MEAL_MINUTES {
            segments.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if window.day_end - cursor >= MIN_MEAL_MINUTES {
        segments.push((cursor, window.day_end));
    }
    segments
}

/// Upper bound on the meals a window can hold: one minimum-length meal per
/// `MIN_MEAL_MINUTES` of span.
pub fn meal_capacity(window: &DayWindow) -> usize {
    usize::try_from(window.span() / MIN_MEAL_MINUTES).unwrap_or(0)
}

/// Guarantees `meals_count` meal entries. Meals already present are discarded
/// and placed again from scratch. Requests beyond `meal_capacity` are capped,
/// and the report keeps the original request.
pub fn ensure_meal_coverage(
    entries: Vec<Entry>,
    meals_count: usize,
    window: &DayWindow,
) -> (Vec<Entry>, MealReport) {
    let mut report = MealReport {
        requested: meals_count,
        placed: 0,
    };
    if window.span() < 1 {
        return (entries, report);
    }

    let mut entries = entries
        .into_iter()
        .map(|entry| {
            if entry.kind == BlockKind::Meal {
                Entry::new(
                    entry.start,
                    entry.end,
                    BlockKind::FocusPlaceholder,
                    FOCUS_BLOCK_TITLE,
                    false,
                )
            } else {
                entry
            }
        })
        .collect::<Vec<_>>();
    sort_entries(&mut entries);

    let capacity = meal_capacity(window);
    if meals_count > capacity {
        debug!(requested = meals_count, capacity, "meal count capped to what the day can hold");
    }
    let titles = expected_meal_titles(meals_count.min(capacity));
    for (index, title) in titles.iter().enumerate() {
        let target = meal_target(index, titles.len(), window);
        let placed = MEAL_MIN_GAPS
            .iter()
            .enumerate()
            .find_map(|(attempt, &min_gap)| {
                let placement = Placement {
                    min_gap,
                    allow_focus_override: attempt > 0,
                };
                let result = insert_meal(&entries, target, title, window, placement);
                if result.is_none() {
                    debug!(title = %title, target, min_gap, "meal placement attempt failed");
                }
                result
            });
        match placed {
            Some(updated) => entries = updated,
            None => debug!(title = %title, target, "meal skipped after every spacing threshold"),
        }
    }

    let entries = reconcile_meals(entries, &titles);
    report.placed = entries
        .iter()
        .filter(|entry| entry.kind == BlockKind::Meal)
        .count();
    if !report.is_complete() {
        warn!(
            requested = report.requested,
            placed = report.placed,
            "day too crowded to place every meal"
        );
    }
    (entries, report)
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    min_gap: i64,
    allow_focus_override: bool,
}

/// Tries the free-segment pass, then filler splitting, then splitting the
/// entry nearest the target. Returns the new entry list on success.
fn insert_meal(
    entries: &[Entry],
    target: i64,
    title: &str,
    window: &DayWindow,
    placement: Placement,
) -> Option<Vec<Entry>> {
    if window.span() < MIN_MEAL_MINUTES {
        return None;
    }
    let meals = meal_spans(entries);

    if let Some((start, end)) = place_in_free_segment(entries, target, window, &meals, placement) {
        return Some(carve(entries.to_vec(), meal_entry(start, end, title)));
    }

    let mut fillers = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            is_splittable(entry, placement)
                && (placement.allow_focus_override || is_filler(entry))
                && entry.duration() >= MEAL_MINUTES
        })
        .collect::<Vec<_>>();
    fillers.sort_by_key(|(_, entry)| entry.start);
    for (index, entry) in fillers {
        if let Some(slot) = split_slot(entry, target)
            && !violates_spacing(&meals, slot, placement.min_gap)
        {
            return Some(split_entry(entries, index, slot, title));
        }
    }

    let mut nearest = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            is_splittable(entry, placement) && entry.duration() >= MIN_MEAL_MINUTES
        })
        .collect::<Vec<_>>();
    nearest.sort_by_key(|(_, entry)| ((entry.start + entry.end - 2 * target).abs(), entry.start));
    for (index, entry) in nearest {
        if let Some(slot) = split_slot(entry, target)
            && !violates_spacing(&meals, slot, placement.min_gap)
        {
            return Some(split_entry(entries, index, slot, title));
        }
    }

    None
}

/// Closest 5-minute-aligned window of 20 to 30 minutes inside a free segment.
/// Ties prefer the longer, then the earlier window.
fn place_in_free_segment(
    entries: &[Entry],
    target: i64,
    window: &DayWindow,
    meals: &[(i64, i64)],
    placement: Placement,
) -> Option<(i64, i64)> {
    let mut best: Option<((i64, i64, i64), (i64, i64))> = None;
    for (segment_start, segment_end) in free_segments(entries, window) {
        let candidates = if is_former_meal_slot(entries, segment_start, segment_end) {
            vec![(segment_start, segment_end)]
        } else {
            (snap_up(segment_start)..=segment_end - MIN_MEAL_MINUTES)
                .step_by(SNAP_MINUTES as usize)
                .map(|start| (start, (start + MEAL_MINUTES).min(segment_end)))
                .collect()
        };
        for (start, end) in candidates {
            if violates_spacing(meals, (start, end), placement.min_gap) {
                continue;
            }
            let rank = ((start - target).abs(), -(end - start), start);
            if best.is_none_or(|(best_rank, _)| rank < best_rank) {
                best = Some((rank, (start, end)));
            }
        }
    }
    best.map(|(_, span)| span)
}

/// A free segment that is exactly one meal-sized placeholder is offered whole,
/// so a meal placed earlier gets its slot back unchanged.
fn is_former_meal_slot(entries: &[Entry], start: i64, end: i64) -> bool {
    (MIN_MEAL_MINUTES..=MEAL_MINUTES).contains(&(end - start))
        && entries.iter().any(|entry| {
            entry.kind == BlockKind::FocusPlaceholder && entry.start == start && entry.end == end
        })
}

/// Meal slot near `target` inside a single entry.
fn split_slot(entry: &Entry, target: i64) -> Option<(i64, i64)> {
    let latest = (entry.end - MEAL_MINUTES).max(entry.start);
    let mut start = target.clamp(entry.start, latest);
    start -= start.rem_euclid(SNAP_MINUTES);
    if start < entry.start {
        start += SNAP_MINUTES;
    }
    let end = (start + MEAL_MINUTES).min(entry.end);
    (end - start >= MIN_MEAL_MINUTES).then_some((start, end))
}

/// Replaces `entries[index]` with its before-remainder, the meal and its
/// after-remainder. Remainders under five minutes are left for the gap filler.
/// Anything else under the meal is carved away.
fn split_entry(entries: &[Entry], index: usize, slot: (i64, i64), title: &str) -> Vec<Entry> {
    let (meal_start, meal_end) = slot;
    let mut updated = Vec::with_capacity(entries.len() + 1);
    for (position, entry) in entries.iter().enumerate() {
        if position != index {
            updated.push(entry.clone());
            continue;
        }
        if meal_start - entry.start >= MIN_REMAINDER_MINUTES {
            updated.push(entry.with_span(entry.start, meal_start));
        }
        if entry.end - meal_end >= MIN_REMAINDER_MINUTES {
            updated.push(entry.with_span(meal_end, entry.end));
        }
    }
    carve(updated, meal_entry(meal_start, meal_end, title))
}

/// Extra meals become focus blocks; the rest take the canonical titles in
/// chronological order.
fn reconcile_meals(mut entries: Vec<Entry>, titles: &[String]) -> Vec<Entry> {
    sort_entries(&mut entries);
    let mut meal_index = 0;
    for entry in entries.iter_mut().filter(|entry| entry.kind == BlockKind::Meal) {
        match titles.get(meal_index) {
            Some(title) => {
                entry.title = title.clone();
                entry.focus_required = false;
            }
            None => {
                entry.kind = BlockKind::FocusBlock;
                entry.title = FOCUS_BLOCK_TITLE.to_string();
                entry.focus_required = true;
            }
        }
        meal_index += 1;
    }
    entries
}

fn meal_entry(start: i64, end: i64, title: &str) -> Entry {
    Entry::new(start, end, BlockKind::Meal, title, false)
}

fn meal_spans(entries: &[Entry]) -> Vec<(i64, i64)> {
    entries
        .iter()
        .filter(|entry| entry.kind == BlockKind::Meal)
        .map(|entry| (entry.start, entry.end))
        .collect()
}

fn violates_spacing(meals: &[(i64, i64)], slot: (i64, i64), min_gap: i64) -> bool {
    let (start, end) = slot;
    meals.iter().any(|&(meal_start, meal_end)| {
        if meal_end <= start {
            start - meal_end < min_gap
        } else if meal_start >= end {
            meal_start - end < min_gap
        } else {
            true
        }
    })
}

fn is_splittable(entry: &Entry, placement: Placement) -> bool {
    !entry.kind.is_fixed()
        && !entry.kind.is_task_like()
        && (placement.allow_focus_override || !entry.focus_required)
}

fn is_filler(entry: &Entry) -> bool {
    let kind = entry.kind.as_str();
    FILLER_KEYWORDS.iter().any(|keyword| kind.contains(keyword))
}

fn snap_up(value: i64) -> i64 {
    value + (SNAP_MINUTES - value.rem_euclid(SNAP_MINUTES)) % SNAP_MINUTES
}
