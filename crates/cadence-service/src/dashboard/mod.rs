//! The per-day dashboard: visible habits, open goals, tasks and the journal entry.

pub mod service;

use chrono::NaiveDate;
use serde::Serialize;

use cadence_db::model::daily_log::DailyLog;
use cadence_db::model::goal::{Goal, progress::GoalProgress};
use cadence_db::model::task::Task;

use crate::habit::sweep::SweepReport;
use crate::habit::visibility::HabitView;

/// An in-progress goal with its progress history.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    /// Entry for the viewed date, if any.
    pub today_progress: Option<GoalProgress>,
    /// Every progress entry of the goal, newest first.
    pub logs: Vec<GoalProgress>,
}

/// Everything shown for one user on one date.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub daily_log: Option<DailyLog>,
    pub habits: Vec<HabitView>,
    pub goals: Vec<GoalView>,
    pub tasks: Vec<Task>,
    /// Present when the read closed expired windows first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepReport>,
}
