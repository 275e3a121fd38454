pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::meals::MealReport;
pub use application::pipeline::{post_process, post_process_json, ScheduleOutcome};
pub use application::window::DayWindow;
pub use domain::models::{
    Block, BlockKind, Commitments, Preferences, Priority, Schedule, Task, TaskList, WeeklyEvent,
};
pub use infrastructure::error::ScheduleError;

use domain::time::parse_weekday;

/// String-in/string-out entry point for hosts that keep the documents as JSON
/// text: returns the normalized schedule document for `weekday`.
pub fn normalize_day_json(
    schedule_raw: &str,
    commitments_raw: &str,
    tasks_raw: &str,
    weekday: &str,
) -> Result<String, String> {
    let weekday =
        parse_weekday(weekday).ok_or_else(|| format!("unknown weekday: {weekday:?}"))?;
    let outcome = post_process_json(schedule_raw, commitments_raw, tasks_raw, weekday)
        .map_err(|error| error.to_string())?;
    serde_json::to_string(&outcome.into_schedule()).map_err(|error| error.to_string())
}
