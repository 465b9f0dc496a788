//! Command-line interface of the `cadence` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use cadence_core::util::date::parse_iso_date;

#[derive(Debug, Parser)]
#[command(name = "cadence")]
#[command(about = "Habit, goal and task tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,

    /// Show the dashboard of a user for one date
    ///
    /// Closes expired habit windows first when the date is current.
    Dashboard {
        #[arg(long, value_name = "UUID")]
        user: Uuid,

        /// Date to show (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        date: NaiveDate,

        /// Reference "today" (defaults to the current UTC date)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Close expired habit windows of a user
    Sweep {
        #[arg(long, value_name = "UUID")]
        user: Uuid,

        /// Evaluate as of this date (defaults to the current UTC date)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Streak and consistency statistics of one habit
    Stats {
        #[arg(long, value_name = "UUID")]
        user: Uuid,

        #[arg(long, value_name = "UUID")]
        habit: Uuid,

        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Print the insight context of a goal as JSON
    Insight {
        #[arg(long, value_name = "UUID")]
        user: Uuid,

        #[arg(long, value_name = "UUID")]
        goal: Uuid,
    },
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    parse_iso_date(input).map_err(|err| err.to_string())
}
