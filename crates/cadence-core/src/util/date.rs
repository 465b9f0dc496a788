//! Calendar date helpers shared by the evaluator and its callers.

use chrono::{NaiveDate, TimeDelta};

use crate::error::{CoreError, CoreResult};

/// ISO 8601 calendar date format (`YYYY-MM-DD`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// ## Summary
/// Parses an ISO 8601 calendar date.
///
/// ## Errors
/// Returns `CoreError::ParseError` if the input is not a valid `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT)
        .map_err(|err| {
            CoreError::ParseError(format!("invalid date '{input}': {err}"))
        })
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Shifts a date by a signed number of days, saturating at the calendar bounds.
#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(days))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}
