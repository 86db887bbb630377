//! Period sizes for periodic notes.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// The period size a periodic note represents.
///
/// Determines which format/folder/template settings apply and how a date is
/// truncated when building its period key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    /// Granularities the index scans, in match-priority order.
    ///
    /// The order is load-bearing: a filename that parses as more than one
    /// granularity resolves as the first one here.
    pub const INDEXED: [Granularity; 3] =
        [Granularity::Day, Granularity::Week, Granularity::Month];

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }

    /// Human-facing adjective ("Daily", "Weekly", ...) for dialog titles.
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Day => "Daily",
            Granularity::Week => "Weekly",
            Granularity::Month => "Monthly",
            Granularity::Quarter => "Quarterly",
            Granularity::Year => "Yearly",
        }
    }

    /// Filename format used when no provider configures one.
    pub fn default_format(self) -> &'static str {
        match self {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Week => "gggg-[W]ww",
            Granularity::Month => "YYYY-MM",
            Granularity::Quarter => "YYYY-[Q]Q",
            Granularity::Year => "YYYY",
        }
    }

    /// First day of the period containing `date`.
    ///
    /// Weeks are ISO-8601 (Monday start); quarters start in January, April,
    /// July and October.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => first_of_month(date.year(), date.month()),
            Granularity::Quarter => first_of_month(date.year(), (date.month0() / 3) * 3 + 1),
            Granularity::Year => first_of_month(date.year(), 1),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 of a valid month always exists.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity '{}'", other)),
        }
    }
}
