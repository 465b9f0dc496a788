//! Per-request index over bulk-loaded habit logs.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use cadence_db::model::habit::log::HabitLog;

/// Habit logs fetched in bulk, indexed by `(habit_id, date)` and by habit.
///
/// Built once per request so that evaluating many habits and windows never
/// needs a query per habit.
#[derive(Debug, Default)]
pub struct LogIndex {
    logs: Vec<HabitLog>,
    by_day: HashMap<(Uuid, NaiveDate), usize>,
    by_habit: HashMap<Uuid, Vec<usize>>,
}

impl LogIndex {
    #[must_use]
    pub fn new(logs: Vec<HabitLog>) -> Self {
        let mut by_day = HashMap::with_capacity(logs.len());
        let mut by_habit: HashMap<Uuid, Vec<usize>> = HashMap::new();

        for (position, log) in logs.iter().enumerate() {
            by_day.insert((log.habit_id, log.date), position);
            by_habit.entry(log.habit_id).or_default().push(position);
        }

        for positions in by_habit.values_mut() {
            positions.sort_by_key(|&position| logs[position].date);
        }

        Self {
            logs,
            by_day,
            by_habit,
        }
    }

    /// The log of `habit_id` on `date`, if any.
    #[must_use]
    pub fn log_on(&self, habit_id: Uuid, date: NaiveDate) -> Option<&HabitLog> {
        self.by_day
            .get(&(habit_id, date))
            .map(|&position| &self.logs[position])
    }

    /// All logs of `habit_id`, oldest first.
    pub fn logs_for(&self, habit_id: Uuid) -> impl Iterator<Item = &HabitLog> {
        self.by_habit
            .get(&habit_id)
            .into_iter()
            .flatten()
            .map(|&position| &self.logs[position])
    }

    /// Success logs of `habit_id` dated within `[start, end]`.
    #[must_use]
    pub fn success_count(&self, habit_id: Uuid, start: NaiveDate, end: NaiveDate) -> u32 {
        let count = self
            .logs_for(habit_id)
            .filter(|log| (start..=end).contains(&log.date))
            .filter(|log| log.is_success())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}
