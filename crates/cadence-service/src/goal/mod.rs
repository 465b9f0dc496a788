//! Goals, their daily progress notes and the context handed to the insight generator.

pub mod insight;
pub mod service;
