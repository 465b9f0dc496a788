//! Recurrence rules parsed from a habit's `frequency` and `frequency_config`.
//!
//! Configuration is validated when a habit is saved; evaluation re-parses the
//! stored JSON and treats any failure as a per-habit configuration error.

use std::collections::BTreeSet;

use serde_json::{Value, json};

use cadence_core::error::{CoreError, CoreResult};
use cadence_core::types::WeekdayCode;
use cadence_db::db::enums::{Frequency, HabitType, TrackingMode};
use cadence_db::model::habit::Habit;

use super::window::WindowRule;

/// Parsed recurrence of a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    /// Due every day.
    Daily,
    /// Due on the listed weekdays only. Never empty.
    Weekly { days: BTreeSet<WeekdayCode> },
    /// `target` successes required in every run of `period` days.
    Windowed(WindowRule),
}

impl Recurrence {
    /// ## Summary
    /// Parses the recurrence of a stored habit.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the stored configuration
    /// does not describe a valid rule for the habit's frequency.
    pub fn from_habit(habit: &Habit) -> CoreResult<Self> {
        Self::parse(habit.frequency, &habit.frequency_config)
    }

    /// ## Summary
    /// Parses and validates a frequency configuration.
    ///
    /// - `DAILY` ignores the configuration.
    /// - `WEEKLY` takes `{"days": ["MON", ...]}` (a bare list is accepted too).
    /// - `WINDOWED` takes `{"target": n, "period": m}` with `1 <= n <= m`;
    ///   numbers may be given as integral JSON numbers or numeric strings.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` describing the first problem found.
    pub fn parse(frequency: Frequency, config: &Value) -> CoreResult<Self> {
        match frequency {
            Frequency::Daily => Ok(Self::Daily),
            Frequency::Weekly => parse_weekly(config),
            Frequency::Windowed => parse_windowed(config),
        }
    }

    /// Canonical JSON form of this rule, as stored on the habit.
    #[must_use]
    pub fn to_config(&self) -> Value {
        match self {
            Self::Daily => json!({}),
            Self::Weekly { days } => json!({ "days": days }),
            Self::Windowed(rule) => json!({ "target": rule.target, "period": rule.period }),
        }
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Windowed(_) => Frequency::Windowed,
        }
    }

    #[must_use]
    pub const fn window_rule(&self) -> Option<&WindowRule> {
        match self {
            Self::Windowed(rule) => Some(rule),
            Self::Daily | Self::Weekly { .. } => None,
        }
    }
}

fn parse_weekly(config: &Value) -> CoreResult<Recurrence> {
    let days = match config {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("days").and_then(Value::as_array),
        _ => None,
    }
    .filter(|items| !items.is_empty())
    .ok_or_else(|| {
        CoreError::InvalidConfiguration(
            "weekly habits require a non-empty list of 'days'".to_string(),
        )
    })?;

    let days = days
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| {
                    CoreError::InvalidConfiguration(format!("weekday must be a string, got {item}"))
                })?
                .parse::<WeekdayCode>()
                .map_err(|err| CoreError::InvalidConfiguration(err.to_string()))
        })
        .collect::<CoreResult<BTreeSet<_>>>()?;

    Ok(Recurrence::Weekly { days })
}

fn parse_windowed(config: &Value) -> CoreResult<Recurrence> {
    let target = coerce_count(config, "target")?;
    let period = coerce_count(config, "period")?;

    if target > period {
        return Err(CoreError::InvalidConfiguration(format!(
            "target ({target}) cannot be greater than the period ({period})"
        )));
    }

    Ok(Recurrence::Windowed(WindowRule { target, period }))
}

/// Reads a positive integer setting, accepting integral numbers and numeric strings.
fn coerce_count(config: &Value, key: &str) -> CoreResult<u32> {
    let raw = config
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| {
            CoreError::InvalidConfiguration(format!("windowed habits require '{key}'"))
        })?;

    let number = match raw {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.is_finite())
                .and_then(|float| format!("{float:.0}").parse::<i64>().ok())
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        CoreError::InvalidConfiguration(format!("'{key}' must be a whole number, got {raw}"))
    })?;

    u32::try_from(number)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or_else(|| {
            CoreError::InvalidConfiguration(format!("'{key}' must be at least 1"))
        })
}

/// ## Summary
/// Validates the parts of a habit definition that must agree with each other
/// and returns the parsed recurrence.
///
/// ## Errors
/// Returns `CoreError::InvalidConfiguration` if the frequency configuration is
/// invalid, or if a quit habit uses anything other than binary tracking.
pub fn validate_definition(
    habit_type: HabitType,
    tracking_mode: TrackingMode,
    frequency: Frequency,
    frequency_config: &Value,
) -> CoreResult<Recurrence> {
    let recurrence = Recurrence::parse(frequency, frequency_config)?;

    if habit_type == HabitType::Quit && tracking_mode != TrackingMode::Binary {
        return Err(CoreError::InvalidConfiguration(
            "quit habits must use binary tracking".to_string(),
        ));
    }

    Ok(recurrence)
}

/// ## Summary
/// Checks a log's `entry_value` against the habit's tracking mode.
///
/// Numeric habits take a number, checklist habits a list; binary habits accept
/// any value. A missing value is always accepted.
///
/// ## Errors
/// Returns `CoreError::ValidationError` if the value has the wrong shape.
pub fn validate_entry_value(
    tracking_mode: TrackingMode,
    entry_value: Option<&Value>,
) -> CoreResult<()> {
    let Some(value) = entry_value.filter(|value| !value.is_null()) else {
        return Ok(());
    };

    match tracking_mode {
        TrackingMode::Numeric if !value.is_number() => Err(CoreError::ValidationError(format!(
            "numeric habits require a number, got {value}"
        ))),
        TrackingMode::Checklist if !value.is_array() => Err(CoreError::ValidationError(format!(
            "checklist habits require a list, got {value}"
        ))),
        TrackingMode::Binary | TrackingMode::Numeric | TrackingMode::Checklist => Ok(()),
    }
}
