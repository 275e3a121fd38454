//! The post-processing pipeline: turns an untrusted draft into a contiguous,
//! canonically typed schedule for one day.

use crate::application::classify::{normalize_entry_types, sanitize_filler_entries};
use crate::application::entries::{ingest, render, sort_entries};
use crate::application::gap_fill::fill_gaps;
use crate::application::meals::{ensure_meal_coverage, MealReport};
use crate::application::routines::ensure_routines;
use crate::application::task_durations::apply_task_durations;
use crate::application::weekly_events::{enforce_weekly_events, events_for_day};
use crate::application::window::DayWindow;
use crate::domain::models::{Block, Preferences, Schedule, Task, WeeklyEvent};
use crate::infrastructure::config::{decode_commitments, decode_schedule, decode_tasks};
use crate::infrastructure::error::ScheduleError;
use chrono::Weekday;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOutcome {
    pub blocks: Vec<Block>,
    pub window: DayWindow,
    pub meals: MealReport,
}

impl ScheduleOutcome {
    pub fn into_schedule(self) -> Schedule {
        Schedule {
            blocks: self.blocks,
        }
    }
}

/// Runs every stage over `draft` and returns blocks covering the whole day
/// window. Never fails: malformed blocks and events are dropped, and meals
/// that do not fit are reported through `ScheduleOutcome::meals`.
pub fn post_process(
    draft: &Schedule,
    preferences: &Preferences,
    tasks: &[Task],
    meals_count: usize,
    todays_events: &[WeeklyEvent],
) -> ScheduleOutcome {
    let window = DayWindow::resolve(preferences, todays_events);

    let entries = ingest(&draft.blocks, &window);
    debug!(
        day_start = window.day_start,
        day_end = window.day_end,
        kept = entries.len(),
        drafted = draft.blocks.len(),
        "ingested draft blocks"
    );

    let entries = enforce_weekly_events(entries, todays_events, &window);
    let entries = ensure_routines(entries, &window, preferences);
    let entries = apply_task_durations(entries, tasks);
    let (entries, meals) = ensure_meal_coverage(entries, meals_count, &window);
    let mut entries = fill_gaps(entries, &window, preferences, tasks);
    sort_entries(&mut entries);
    let entries = sanitize_filler_entries(entries, tasks);
    let entries = normalize_entry_types(entries, tasks);
    debug!(blocks = entries.len(), meals = meals.placed, "schedule normalized");

    ScheduleOutcome {
        blocks: render(entries),
        window,
        meals,
    }
}

/// Decodes the stored documents and post-processes the draft for `weekday`,
/// using that day's weekly events and the preferred meal count.
pub fn post_process_json(
    schedule_raw: &str,
    commitments_raw: &str,
    tasks_raw: &str,
    weekday: Weekday,
) -> Result<ScheduleOutcome, ScheduleError> {
    let started = Instant::now();
    let draft = decode_schedule(schedule_raw)?;
    let commitments = decode_commitments(commitments_raw)?;
    let tasks = decode_tasks(tasks_raw)?;

    let todays_events = events_for_day(&commitments.weekly_events, weekday);
    let meals_count = commitments.preferences.meals_per_day as usize;
    let outcome = post_process(
        &draft,
        &commitments.preferences,
        &tasks.tasks,
        meals_count,
        &todays_events,
    );

    info!(
        weekday = %weekday,
        blocks = outcome.blocks.len(),
        events = todays_events.len(),
        meals_requested = outcome.meals.requested,
        meals_placed = outcome.meals.placed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "post-processed schedule"
    );
    Ok(outcome)
}
