//! Habit recurrence and visibility engine.
//!
//! Pure rule evaluation (`recurrence`, `window`, `visibility`, `stats` and the
//! planning half of `sweep`) operates on bulk-loaded rows indexed by
//! [`log_index::LogIndex`]; `service` and `sweep` own the storage round trips.

pub mod log_index;
pub mod recurrence;
pub mod service;
pub mod stats;
pub mod sweep;
pub mod visibility;
pub mod window;

#[cfg(test)]
pub(crate) mod fixtures;
