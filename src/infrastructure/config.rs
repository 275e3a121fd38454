//! Decoding of the caller's stored documents (commitments, tasks, schedule).
//!
//! Decoding is lenient: a field that is missing or malformed falls back to its
//! default and a list item that cannot be read is skipped. Only a payload
//! that is not a JSON object at all is rejected. The `*_strict` decoders are
//! the exception, for callers that want bad documents reported.

use crate::domain::models::{
    Block, BlockKind, Commitments, Preferences, Priority, Schedule, Task, TaskList, WeeklyEvent,
    DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_BLOCK_MINUTES, DEFAULT_MEALS_PER_DAY,
    DEFAULT_ROUTINE_MINUTES, MIN_FOCUS_BLOCK_MINUTES,
};
use crate::domain::time::{from_12_hour, try_parse_time};
use crate::infrastructure::error::ScheduleError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

const COMMITMENTS_DOCUMENT: &str = "commitments";
const TASKS_DOCUMENT: &str = "tasks";
const SCHEDULE_DOCUMENT: &str = "schedule";

fn default_documents() -> HashMap<&'static str, Value> {
    HashMap::from([
        (
            COMMITMENTS_DOCUMENT,
            serde_json::json!({
                "weekly_events": [],
                "preferences": {
                    "wake_time": "07:00",
                    "sleep_time": "23:00",
                    "focus_block_length": DEFAULT_FOCUS_BLOCK_MINUTES,
                    "break_length": DEFAULT_BREAK_MINUTES,
                    "meals_per_day": DEFAULT_MEALS_PER_DAY,
                    "morning_routine_length": DEFAULT_ROUTINE_MINUTES,
                    "evening_routine_length": DEFAULT_ROUTINE_MINUTES
                }
            }),
        ),
        (TASKS_DOCUMENT, serde_json::json!({ "tasks": [] })),
        (SCHEDULE_DOCUMENT, serde_json::json!({ "blocks": [] })),
    ])
}

fn parse_document(raw: &str, name: &'static str) -> Result<Value, ScheduleError> {
    if raw.trim().is_empty() {
        return default_documents()
            .remove(name)
            .ok_or_else(|| ScheduleError::InvalidDocument(format!("unknown document {name}")));
    }
    let parsed: Value = serde_json::from_str(raw)?;
    if !parsed.is_object() {
        return Err(ScheduleError::InvalidDocument(format!(
            "{name} must be a JSON object"
        )));
    }
    Ok(parsed)
}

pub fn decode_commitments(raw: &str) -> Result<Commitments, ScheduleError> {
    Ok(commitments_from_value(&parse_document(raw, COMMITMENTS_DOCUMENT)?))
}

/// Typed decoding followed by validation; errors instead of falling back.
pub fn decode_commitments_strict(raw: &str) -> Result<Commitments, ScheduleError> {
    let document = parse_document(raw, COMMITMENTS_DOCUMENT)?;
    let commitments: Commitments = serde_json::from_value(document)?;
    commitments
        .validate()
        .map_err(ScheduleError::InvalidPreferences)?;
    Ok(commitments)
}

pub fn decode_tasks(raw: &str) -> Result<TaskList, ScheduleError> {
    Ok(tasks_from_value(&parse_document(raw, TASKS_DOCUMENT)?))
}

pub fn decode_tasks_strict(raw: &str) -> Result<TaskList, ScheduleError> {
    let tasks: TaskList = serde_json::from_value(parse_document(raw, TASKS_DOCUMENT)?)?;
    tasks.validate().map_err(ScheduleError::InvalidDocument)?;
    Ok(tasks)
}

pub fn decode_schedule(raw: &str) -> Result<Schedule, ScheduleError> {
    Ok(schedule_from_value(&parse_document(raw, SCHEDULE_DOCUMENT)?))
}

pub fn decode_schedule_strict(raw: &str) -> Result<Schedule, ScheduleError> {
    let schedule: Schedule = serde_json::from_value(parse_document(raw, SCHEDULE_DOCUMENT)?)?;
    schedule.validate().map_err(ScheduleError::InvalidDocument)?;
    Ok(schedule)
}

pub fn commitments_from_value(document: &Value) -> Commitments {
    let weekly_events = document
        .get("weekly_events")
        .and_then(Value::as_array)
        .map(|events| {
            events
                .iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let event = read_weekly_event(value);
                    if event.is_none() {
                        debug!(index, "skipping weekly event without day/start/end");
                    }
                    event
                })
                .collect()
        })
        .unwrap_or_default();

    Commitments {
        weekly_events,
        preferences: read_preferences(document.get("preferences")),
    }
}

pub fn tasks_from_value(document: &Value) -> TaskList {
    let tasks = document
        .get("tasks")
        .and_then(Value::as_array)
        .map(|tasks| tasks.iter().filter_map(read_task).collect())
        .unwrap_or_default();
    TaskList { tasks }
}

pub fn schedule_from_value(document: &Value) -> Schedule {
    let blocks = document
        .get("blocks")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let block = read_block(value);
                    if block.is_none() {
                        debug!(index, "skipping draft block without start/end");
                    }
                    block
                })
                .collect()
        })
        .unwrap_or_default();
    Schedule { blocks }
}

fn read_preferences(value: Option<&Value>) -> Preferences {
    let mut preferences = Preferences::default();
    let Some(object) = value.and_then(Value::as_object) else {
        return preferences;
    };

    if let Some(wake_time) = read_clock(object, "wake_time") {
        preferences.wake_time = wake_time;
    }
    if let Some(sleep_time) = read_clock(object, "sleep_time") {
        preferences.sleep_time = sleep_time;
    }
    if let Some(value) = read_minutes(object, "focus_block_length") {
        preferences.focus_block_length = value.max(MIN_FOCUS_BLOCK_MINUTES);
    }
    if let Some(value) = read_minutes(object, "break_length") {
        preferences.break_length = value;
    }
    if let Some(value) = read_minutes(object, "meals_per_day") {
        preferences.meals_per_day = value;
    }
    if let Some(value) = read_minutes(object, "morning_routine_length") {
        preferences.morning_routine_length = value;
    }
    if let Some(value) = read_minutes(object, "evening_routine_length") {
        preferences.evening_routine_length = value;
    }

    preferences
}

fn read_weekly_event(value: &Value) -> Option<WeeklyEvent> {
    let object = value.as_object()?;
    Some(WeeklyEvent {
        day: read_string(object, "day")?,
        start: read_string(object, "start")?,
        end: read_string(object, "end")?,
        title: read_string(object, "title").unwrap_or_default(),
    })
}

fn read_task(value: &Value) -> Option<Task> {
    let object = value.as_object()?;
    let name = read_string(object, "name").filter(|name| !name.trim().is_empty())?;
    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse)
        .unwrap_or_default();
    Some(Task {
        name,
        duration: read_minutes(object, "duration").unwrap_or(0),
        priority,
    })
}

fn read_block(value: &Value) -> Option<Block> {
    let object = value.as_object()?;
    Some(Block {
        start: read_string(object, "start")?,
        end: read_string(object, "end")?,
        kind: BlockKind::parse(&read_string(object, "type").unwrap_or_default()),
        title: read_string(object, "title").unwrap_or_default(),
        focus_required: object
            .get("focus_required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn read_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Accepts `HH:MM` or a 12-hour `h:mm AM` clock string.
fn read_clock(object: &Map<String, Value>, key: &str) -> Option<String> {
    let raw = object.get(key).and_then(Value::as_str)?.trim();
    if try_parse_time(raw).is_some() {
        return Some(raw.to_string());
    }
    from_12_hour(raw)
}

fn read_minutes(object: &Map<String, Value>, key: &str) -> Option<u32> {
    let value = object.get(key)?;
    if let Some(number) = value.as_u64() {
        return u32::try_from(number).ok();
    }
    if let Some(number) = value.as_f64() {
        return (number >= 0.0 && number <= f64::from(u32::MAX)).then(|| number.floor() as u32);
    }
    value.as_str().and_then(|raw| raw.trim().parse::<u32>().ok())
}
