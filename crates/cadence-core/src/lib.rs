//! Shared building blocks for the Cadence tracker: settings, the core error
//! type and calendar helpers that carry no database dependencies.

pub mod config;
pub mod error;
pub mod types;
pub mod util;
