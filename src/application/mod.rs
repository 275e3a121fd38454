pub mod classify;
pub mod entries;
pub mod gap_fill;
pub mod meals;
pub mod pipeline;
pub mod routines;
pub mod task_durations;
pub mod weekly_events;
pub mod window;
