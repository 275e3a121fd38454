use crate::domain::time::{parse_weekday, try_parse_time};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS_BLOCK_MINUTES: u32 = 50;
pub const DEFAULT_BREAK_MINUTES: u32 = 10;
pub const DEFAULT_MEALS_PER_DAY: u32 = 3;
pub const DEFAULT_ROUTINE_MINUTES: u32 = 30;
pub const MIN_FOCUS_BLOCK_MINUTES: u32 = 5;

/// Semantic type of a block. The wire format is an open string; anything the
/// pipeline does not recognize is carried as `Other` until the final
/// normalization pass reclassifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Meal,
    WeeklyEvent,
    MorningRoutine,
    EveningRoutine,
    FocusBlock,
    Focus,
    FocusPlaceholder,
    FreeTime,
    Break,
    Task,
    Todo,
    Other(String),
}

impl BlockKind {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "meal" => Self::Meal,
            "weekly_event" => Self::WeeklyEvent,
            "morning_routine" => Self::MorningRoutine,
            "evening_routine" => Self::EveningRoutine,
            "focus_block" => Self::FocusBlock,
            "focus" => Self::Focus,
            "focus_placeholder" => Self::FocusPlaceholder,
            "freetime" | "free_time" => Self::FreeTime,
            "break" => Self::Break,
            "task" => Self::Task,
            "todo" => Self::Todo,
            _ => Self::Other(normalized),
        }
    }

    /// Lower-cased wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Meal => "meal",
            Self::WeeklyEvent => "weekly_event",
            Self::MorningRoutine => "morning_routine",
            Self::EveningRoutine => "evening_routine",
            Self::FocusBlock => "focus_block",
            Self::Focus => "focus",
            Self::FocusPlaceholder => "focus_placeholder",
            Self::FreeTime => "freetime",
            Self::Break => "break",
            Self::Task => "task",
            Self::Todo => "todo",
            Self::Other(value) => value,
        }
    }

    /// Anchors that task pushes and meal splitting must never move or shrink.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            Self::Meal | Self::WeeklyEvent | Self::MorningRoutine | Self::EveningRoutine
        )
    }

    pub fn is_routine(&self) -> bool {
        matches!(self, Self::MorningRoutine | Self::EveningRoutine)
    }

    pub fn is_task_like(&self) -> bool {
        match self {
            Self::Task | Self::Todo => true,
            Self::Other(value) => value.starts_with("task") || value.contains("todo"),
            _ => false,
        }
    }
}

impl Default for BlockKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub start: String,
    pub end: String,
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub focus_required: bool,
}

impl Block {
    pub fn validate(&self) -> Result<(), String> {
        validate_hhmm(&self.start, "block.start")?;
        validate_hhmm(&self.end, "block.end")?;
        if self.start.trim() == self.end.trim() {
            return Err("block.end must differ from block.start".to_string());
        }
        Ok(())
    }
}

/// The `{"blocks": [...]}` document exchanged with the draft generator and
/// the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Schedule {
    pub fn validate(&self) -> Result<(), String> {
        for (index, block) in self.blocks.iter().enumerate() {
            block.validate().map_err(|error| format!("blocks[{index}]: {error}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub wake_time: String,
    pub sleep_time: String,
    pub focus_block_length: u32,
    pub break_length: u32,
    pub meals_per_day: u32,
    pub morning_routine_length: u32,
    pub evening_routine_length: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            wake_time: "07:00".to_string(),
            sleep_time: "23:00".to_string(),
            focus_block_length: DEFAULT_FOCUS_BLOCK_MINUTES,
            break_length: DEFAULT_BREAK_MINUTES,
            meals_per_day: DEFAULT_MEALS_PER_DAY,
            morning_routine_length: DEFAULT_ROUTINE_MINUTES,
            evening_routine_length: DEFAULT_ROUTINE_MINUTES,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<(), String> {
        validate_hhmm(&self.wake_time, "preferences.wake_time")?;
        validate_hhmm(&self.sleep_time, "preferences.sleep_time")?;
        if self.focus_block_length < MIN_FOCUS_BLOCK_MINUTES {
            return Err(format!(
                "preferences.focus_block_length must be >= {MIN_FOCUS_BLOCK_MINUTES}"
            ));
        }
        Ok(())
    }

    pub fn focus_minutes(&self) -> i64 {
        i64::from(self.focus_block_length.max(MIN_FOCUS_BLOCK_MINUTES))
    }

    pub fn break_minutes(&self) -> i64 {
        i64::from(self.break_length)
    }

    /// Zero means "unset" and falls back to the default routine length.
    pub fn morning_routine_minutes(&self) -> i64 {
        routine_minutes(self.morning_routine_length)
    }

    pub fn evening_routine_minutes(&self) -> i64 {
        routine_minutes(self.evening_routine_length)
    }
}

fn routine_minutes(value: u32) -> i64 {
    if value == 0 {
        i64::from(DEFAULT_ROUTINE_MINUTES)
    } else {
        i64::from(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyEvent {
    pub day: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub title: String,
}

impl WeeklyEvent {
    pub fn validate(&self) -> Result<(), String> {
        if parse_weekday(&self.day).is_none() {
            return Err("weekly_event.day must be a weekday name".to_string());
        }
        validate_hhmm(&self.start, "weekly_event.start")?;
        validate_hhmm(&self.end, "weekly_event.end")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub duration: u32,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.name, "task.name")?;
        if self.duration == 0 {
            return Err("task.duration must be > 0".to_string());
        }
        Ok(())
    }

    /// Key used to match block titles against this task.
    pub fn match_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commitments {
    #[serde(default)]
    pub weekly_events: Vec<WeeklyEvent>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Commitments {
    pub fn validate(&self) -> Result<(), String> {
        self.preferences.validate()?;
        for event in &self.weekly_events {
            event.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn validate(&self) -> Result<(), String> {
        for (index, task) in self.tasks.iter().enumerate() {
            task.validate().map_err(|error| format!("tasks[{index}]: {error}"))?;
        }
        Ok(())
    }
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

fn validate_hhmm(value: &str, field_name: &str) -> Result<(), String> {
    try_parse_time(value)
        .map(|_| ())
        .ok_or_else(|| format!("{field_name} must be HH:MM"))
}
