//! One-off to-do items shown on the dashboard until the day they are completed.

pub mod service;
