use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),
}
