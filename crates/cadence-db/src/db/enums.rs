//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use cadence_core::error::CoreError;

/// Habit recurrence kind.
///
/// Maps to `habits.frequency` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Windowed,
}

impl ToSql<Text, Pg> for Frequency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for Frequency {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"DAILY" => Ok(Self::Daily),
            b"WEEKLY" => Ok(Self::Weekly),
            b"WINDOWED" => Ok(Self::Windowed),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl Frequency {
    /// Returns the database string representation of this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Windowed => "WINDOWED",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "WINDOWED" => Ok(Self::Windowed),
            _ => Err(CoreError::ParseError(format!("unknown frequency '{s}'"))),
        }
    }
}

/// Whether a habit is built up or quit.
///
/// Maps to `habits.habit_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitType {
    Build,
    Quit,
}

impl ToSql<Text, Pg> for HabitType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for HabitType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"BUILD" => Ok(Self::Build),
            b"QUIT" => Ok(Self::Quit),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl HabitType {
    /// Returns the database string representation of this habit type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "BUILD",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUILD" => Ok(Self::Build),
            "QUIT" => Ok(Self::Quit),
            _ => Err(CoreError::ParseError(format!("unknown habit type '{s}'"))),
        }
    }
}

/// How a habit log records its value.
///
/// Maps to `habits.tracking_mode` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingMode {
    /// Yes/no
    Binary,
    /// Counter
    Numeric,
    /// Sub-items
    Checklist,
}

impl ToSql<Text, Pg> for TrackingMode {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for TrackingMode {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"BINARY" => Ok(Self::Binary),
            b"NUMERIC" => Ok(Self::Numeric),
            b"CHECKLIST" => Ok(Self::Checklist),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl TrackingMode {
    /// Returns the database string representation of this tracking mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::Numeric => "NUMERIC",
            Self::Checklist => "CHECKLIST",
        }
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BINARY" => Ok(Self::Binary),
            "NUMERIC" => Ok(Self::Numeric),
            "CHECKLIST" => Ok(Self::Checklist),
            _ => Err(CoreError::ParseError(format!(
                "unknown tracking mode '{s}'"
            ))),
        }
    }
}

/// Outcome recorded for a habit on one calendar date.
///
/// Maps to `habit_logs.status` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Done,
    Missed,
    Partial,
    /// Success for quit habits
    Resisted,
    /// Written by the window sweep when a windowed target was not met
    Failed,
}

impl ToSql<Text, Pg> for LogStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for LogStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"DONE" => Ok(Self::Done),
            b"MISSED" => Ok(Self::Missed),
            b"PARTIAL" => Ok(Self::Partial),
            b"RESISTED" => Ok(Self::Resisted),
            b"FAILED" => Ok(Self::Failed),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl LogStatus {
    /// Statuses that count towards a habit's target.
    pub const SUCCESSES: [Self; 2] = [Self::Done, Self::Resisted];

    /// Returns the database string representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "DONE",
            Self::Missed => "MISSED",
            Self::Partial => "PARTIAL",
            Self::Resisted => "RESISTED",
            Self::Failed => "FAILED",
        }
    }

    /// Returns true for DONE and RESISTED.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Done | Self::Resisted)
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DONE" => Ok(Self::Done),
            "MISSED" => Ok(Self::Missed),
            "PARTIAL" => Ok(Self::Partial),
            "RESISTED" => Ok(Self::Resisted),
            "FAILED" => Ok(Self::Failed),
            _ => Err(CoreError::ParseError(format!("unknown log status '{s}'"))),
        }
    }
}
