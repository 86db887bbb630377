//! Canonical period keys.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::granularity::Granularity;

/// Canonical key for one period instance, independent of how the note's
/// filename happens to be formatted.
///
/// Shaped as `<granularity>-<start-of-period instant>`, e.g.
/// `day-2024-03-15T00:00:00` or `week-2024-03-11T00:00:00`. Any two dates in
/// the same period produce the same key, and the embedded granularity name
/// keeps keys from ever colliding across granularities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateUid(String);

impl DateUid {
    pub fn new(date: NaiveDate, granularity: Granularity) -> Self {
        let start = granularity.start_of(date);
        DateUid(format!("{}-{}T00:00:00", granularity.name(), start.format("%Y-%m-%d")))
    }

    /// Wrap a key previously produced by [`DateUid::new`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        DateUid(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_uid_shape() {
        assert_eq!(
            DateUid::new(date(2024, 3, 15), Granularity::Day).as_str(),
            "day-2024-03-15T00:00:00"
        );
    }

    #[test]
    fn test_dates_in_same_period_share_a_uid() {
        let friday = DateUid::new(date(2024, 3, 15), Granularity::Week);
        let monday = DateUid::new(date(2024, 3, 11), Granularity::Week);
        assert_eq!(friday, monday);
        assert_eq!(friday.as_str(), "week-2024-03-11T00:00:00");

        let mid_month = DateUid::new(date(2024, 3, 15), Granularity::Month);
        assert_eq!(mid_month.as_str(), "month-2024-03-01T00:00:00");
    }

    #[test]
    fn test_granularity_is_part_of_the_key() {
        // 2024-01-01 is the start of its day, week, month, quarter and year.
        let day = DateUid::new(date(2024, 1, 1), Granularity::Day);
        let week = DateUid::new(date(2024, 1, 1), Granularity::Week);
        assert_ne!(day, week);
    }
}
