//! Per-day mood and energy journal.

pub mod service;
