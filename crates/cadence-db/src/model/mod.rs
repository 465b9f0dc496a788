pub mod daily_log;
pub mod goal;
pub mod habit;
pub mod task;
pub mod user;
