//! Persistence layer for the Cadence tracker: diesel schema, text-backed
//! enums, row models and query functions over a pooled async connection.

pub mod db;
pub mod error;
pub mod model;
