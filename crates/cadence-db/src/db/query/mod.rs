pub mod daily_log;
pub mod goal;
pub mod goal_progress;
pub mod habit;
pub mod habit_log;
pub mod task;
pub mod user;
