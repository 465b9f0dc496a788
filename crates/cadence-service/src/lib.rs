//! Business logic for the Cadence tracker.
//!
//! The habit recurrence and visibility engine lives in [`habit`]; the
//! remaining modules are the services that feed the daily dashboard.

pub mod dashboard;
pub mod error;
pub mod goal;
pub mod habit;
pub mod journal;
pub mod task;
